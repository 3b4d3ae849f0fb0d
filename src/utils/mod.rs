// src/utils/mod.rs

pub mod access;
