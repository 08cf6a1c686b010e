pub mod console;
pub mod pp;
pub mod recommend;
