/// Raw block listing command.
pub mod blocks;
/// File-level information command.
pub mod info;
/// Scene graph loading command.
pub mod scene;

pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;
