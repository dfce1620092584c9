pub mod codec;
pub mod comps;
pub mod exec;
pub mod geom;
pub mod library;
pub mod model;
pub mod savefile;

#[cfg(test)]
mod tests;
