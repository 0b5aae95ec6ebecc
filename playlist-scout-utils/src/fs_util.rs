use std::{fmt::Debug, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;

fn read_with<P, T>(path: P, parse: impl FnOnce(&str) -> anyhow::Result<T>) -> anyhow::Result<T>
where
    P: Into<PathBuf> + Debug,
{
    let path = path.into();
    (|| parse(&fs_err::read_to_string(&path)?))().with_context(|| {
        format!(
            "While trying to read {path:?} as {}",
            std::any::type_name::<T>()
        )
    })
}

pub fn read_json<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    read_with(path, |s| Ok(serde_json::from_str(s)?))
}

pub fn read_toml<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    read_with(path, |s| Ok(toml::from_str(s)?))
}
