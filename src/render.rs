pub mod canvas;
pub mod composite;
pub mod gradient;
pub mod photo;
pub mod pipeline;
