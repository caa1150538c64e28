// src/utils/mod.rs

pub mod exam_id;
pub mod html;
pub mod normalize;
