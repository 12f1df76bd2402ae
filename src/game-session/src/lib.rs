pub mod entrypoint;
pub mod model;
pub mod service;

#[cfg(test)]
mod test;
