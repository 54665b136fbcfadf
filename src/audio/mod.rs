pub(crate) mod trim;
