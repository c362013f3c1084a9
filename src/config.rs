//! Настройки приложения.
//!
//! Источник: переменные окружения поверх значений по умолчанию.
//! Настройки только читаются; сохранение делает внешний UI.

use std::path::PathBuf;

use log::debug;

use crate::error::PrismError;
use crate::hierarchy::ListingOrder;
use crate::tree::CheckingMode;

/// Корень событий внутри домашней директории: `~/PRISM/events`.
pub const DEFAULT_EVENTS_SUBDIR: [&str; 2] = ["PRISM", "events"];

pub const ENV_EVENTS_ROOT: &str = "PRISM_EVENTS_ROOT";
pub const ENV_LISTING_ORDER: &str = "PRISM_LISTING_ORDER";
pub const ENV_CHECKING_MODE: &str = "PRISM_CHECKING_MODE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub events_root: PathBuf,
    /// Значения по умолчанию для флажков V1/V2 в диалоге.
    pub include_v1: bool,
    pub include_v2: bool,
    pub checking_mode: CheckingMode,
    pub listing_order: ListingOrder,
}

impl Preferences {
    pub fn with_events_root(events_root: impl Into<PathBuf>) -> Self {
        Self {
            events_root: events_root.into(),
            include_v1: true,
            include_v2: false,
            checking_mode: CheckingMode::default(),
            listing_order: ListingOrder::default(),
        }
    }

    /// `~/PRISM/events`.
    pub fn default_events_root() -> Result<PathBuf, PrismError> {
        let home = dirs::home_dir().ok_or(PrismError::HomeDirNotFound)?;
        Ok(DEFAULT_EVENTS_SUBDIR
            .iter()
            .fold(home, |path, segment| path.join(segment)))
    }

    /// Настройки из процесса (`std::env`).
    pub fn from_env() -> Result<Self, PrismError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Настройки из произвольного источника ключ → значение.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PrismError> {
        let events_root = match lookup(ENV_EVENTS_ROOT).filter(|v| !v.trim().is_empty()) {
            Some(root) => {
                let root = PathBuf::from(root.trim());
                if !root.is_absolute() {
                    return Err(PrismError::InvalidConfig {
                        key: ENV_EVENTS_ROOT,
                        value: root.display().to_string(),
                    });
                }
                root
            }
            None => Self::default_events_root()?,
        };

        let mut prefs = Self::with_events_root(events_root);
        if let Some(order) = lookup(ENV_LISTING_ORDER) {
            prefs.listing_order = order.parse()?;
        }
        if let Some(mode) = lookup(ENV_CHECKING_MODE) {
            prefs.checking_mode = mode.parse()?;
        }

        debug!("Preferences loaded: {prefs:?}");
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_overrides() {
        let prefs = Preferences::from_lookup(lookup(&[
            (ENV_EVENTS_ROOT, "/data/events"),
            (ENV_LISTING_ORDER, "native"),
            (ENV_CHECKING_MODE, "simple"),
        ]))
        .unwrap();

        assert_eq!(prefs.events_root, PathBuf::from("/data/events"));
        assert_eq!(prefs.listing_order, ListingOrder::Native);
        assert_eq!(prefs.checking_mode, CheckingMode::Simple);
        assert!(prefs.include_v1);
        assert!(!prefs.include_v2);
    }

    #[test]
    fn rejects_relative_events_root() {
        let err = Preferences::from_lookup(lookup(&[(ENV_EVENTS_ROOT, "events")])).unwrap_err();
        assert!(err.to_string().contains(ENV_EVENTS_ROOT));
    }

    #[test]
    fn rejects_unknown_listing_order() {
        let result = Preferences::from_lookup(lookup(&[
            (ENV_EVENTS_ROOT, "/data/events"),
            (ENV_LISTING_ORDER, "shuffled"),
        ]));
        assert!(matches!(result, Err(PrismError::InvalidConfig { .. })));
    }

    #[test]
    fn defaults_to_sorted_propagate() {
        let prefs = Preferences::with_events_root("/x");
        assert_eq!(prefs.listing_order, ListingOrder::Sorted);
        assert_eq!(prefs.checking_mode, CheckingMode::Propagate);
    }
}
