pub mod mind_map;

#[cfg(test)]
mod mind_map_test;

pub use mind_map::MindMap;
