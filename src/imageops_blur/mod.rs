pub mod area_resize;
pub mod backend;
pub mod fast_blur;
pub mod pixel_buffer;
pub mod stack_blur;
