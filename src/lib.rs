pub mod ad;
pub mod bootstrap;
pub mod channels;
pub mod controller;
pub mod countdown;
pub mod debug_console;
pub mod dispatch;
pub mod gate;
pub mod gui;
pub mod host;
pub mod launcher;
pub mod logging;
pub mod notice;
pub mod render;
pub mod session;
pub mod settings;
pub mod view;
