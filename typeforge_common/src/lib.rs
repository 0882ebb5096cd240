pub mod charset;
pub mod paths;
pub mod ranges;

pub const FILTER_SPEC: &str =
    "typeforge=debug,typeforge_common=debug,typeforge_fontops=debug,info";
