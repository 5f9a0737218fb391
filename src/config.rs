#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DeserializeCfg {
    pub deny_unknown_fields: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SerializeCfg {
    /// Write non-string map keys bare, e.g. `{1:"a"}`, instead of quoting them.
    pub raw_map_keys: bool,
}
