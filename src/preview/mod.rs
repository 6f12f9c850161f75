pub(crate) mod capabilities;
pub(crate) mod compositor;
pub(crate) mod maps;
