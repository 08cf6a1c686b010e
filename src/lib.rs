#![allow(async_fn_in_trait)]

pub mod commands;
pub mod config;
pub mod context;
pub mod logs;
pub mod osu;
pub mod session;
pub mod time;
