#![allow(dead_code)]

pub mod track_server;
