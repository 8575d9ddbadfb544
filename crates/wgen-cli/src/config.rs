use std::{fs, path::Path};

use color_eyre::{eyre::Context as _, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wgen::{Generic, Weights};

/// Defaults for the `wgen` command, read from a TOML file.
///
/// ```toml
/// seed = 42
/// size = 20
///
/// [weights]
/// tree = [1, 3]
/// expr = { num = 3, var = 2, add = 1 }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub samples: Option<usize>,
    #[serde(default)]
    pub base_depth: Option<usize>,
    /// Constructor weights per demo type, keyed by the type's snake-case name.
    #[serde(default)]
    pub weights: IndexMap<String, WeightSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightSpec {
    /// One weight per constructor, in declaration order.
    List(Vec<u32>),
    /// Weights by constructor name. Unlisted constructors keep their
    /// declared weight.
    Named(IndexMap<String, u32>),
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let src = fs::read_to_string(path)
            .wrap_err_with(|| format!("could not read config at {path:?}"))?;
        let config =
            toml::from_str(&src).wrap_err_with(|| format!("error parsing config from {path:?}"))?;
        tracing::debug!(?path, ?config, "loaded config");
        Ok(config)
    }

    /// The weights configured for `T`, if any.
    pub fn weights_for<T: Generic>(&self) -> Result<Option<Weights<T>>> {
        let key = type_key::<T>();
        let Some(spec) = self.weights.get(&key) else {
            return Ok(None);
        };
        spec.resolve::<T>()
            .map(Some)
            .wrap_err_with(|| format!("invalid weights for `{key}` in config"))
    }
}

impl WeightSpec {
    pub fn resolve<T: Generic>(&self) -> Result<Weights<T>> {
        match self {
            WeightSpec::List(weights) => Ok(Weights::from_slice(weights)?),
            WeightSpec::Named(table) => {
                let entries = table.iter().map(|(name, &weight)| {
                    (constructor_name::<T>(name).unwrap_or(name.as_str()), weight)
                });
                Ok(Weights::<T>::declared().with_names(entries)?)
            }
        }
    }
}

/// The key a type's weights are stored under, e.g. `binary_tree` for
/// `BinaryTree`.
pub fn type_key<T: Generic>() -> String {
    heck::AsSnakeCase(T::NAME).to_string()
}

/// Match `key` against the constructors of `T` by snake-case name, so both
/// `big_leaf` and `BigLeaf` name the `BigLeaf` constructor.
fn constructor_name<T: Generic>(key: &str) -> Option<&'static str> {
    let key = heck::AsSnakeCase(key).to_string();
    (0..T::CONSTRUCTORS)
        .map(T::constructor_name)
        .find(|name| heck::AsSnakeCase(name).to_string() == key)
}
