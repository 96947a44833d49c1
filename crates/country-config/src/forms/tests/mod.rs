mod common;
mod definitions;
mod engine;
