pub mod html;
pub mod ip;
