//! Содержимое корня событий для диалога "Open event".

use std::path::Path;

use crate::error::PrismError;
use crate::hierarchy::{DirectoryListing, VersionFolder, TROUBLE_FOLDER};

/// Какие папки версий есть у станции.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationLayout {
    pub v1: bool,
    pub v2: bool,
    pub trouble_v1: bool,
    pub trouble_v2: bool,
}

impl StationLayout {
    pub fn has_trouble(&self) -> bool {
        self.trouble_v1 || self.trouble_v2
    }

    pub fn is_empty(&self) -> bool {
        !(self.v1 || self.v2 || self.has_trouble())
    }
}

/// Имена событий: подкаталоги корня.
pub fn list_events(listing: &impl DirectoryListing, events_root: &Path) -> Result<Vec<String>, PrismError> {
    if !listing.is_dir(events_root) {
        return Err(PrismError::NotADirectory(events_root.to_path_buf()));
    }
    dir_names(listing, events_root)
}

/// Имена станций события.
pub fn list_stations(
    listing: &impl DirectoryListing,
    events_root: &Path,
    event: &str,
) -> Result<Vec<String>, PrismError> {
    let event_dir = events_root.join(event);
    if !listing.is_dir(&event_dir) {
        return Err(PrismError::NotADirectory(event_dir));
    }
    dir_names(listing, &event_dir)
}

pub fn station_layout(
    listing: &impl DirectoryListing,
    events_root: &Path,
    event: &str,
    station: &str,
) -> Result<StationLayout, PrismError> {
    let station_dir = events_root.join(event).join(station);
    let trouble_dir = listing.find_dir_ignore_case(&station_dir, TROUBLE_FOLDER)?;
    let in_trouble = |version: VersionFolder| {
        trouble_dir
            .as_ref()
            .is_some_and(|dir| listing.is_dir(&dir.join(version.name())))
    };

    Ok(StationLayout {
        v1: listing.is_dir(&station_dir.join(VersionFolder::V1.name())),
        v2: listing.is_dir(&station_dir.join(VersionFolder::V2.name())),
        trouble_v1: in_trouble(VersionFolder::V1),
        trouble_v2: in_trouble(VersionFolder::V2),
    })
}

fn dir_names(listing: &impl DirectoryListing, dir: &Path) -> Result<Vec<String>, PrismError> {
    Ok(listing
        .list_dirs(dir)?
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::FsListing;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_events_and_stations() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp.path().join("EQ2021").join("STA2")).unwrap();
        fs::create_dir_all(temp.path().join("EQ2020").join("STA1")).unwrap();
        fs::create_dir_all(temp.path().join("EQ2020").join("STA0")).unwrap();
        fs::write(temp.path().join("readme.txt"), "x").unwrap();

        let listing = FsListing::default();
        assert_eq!(list_events(&listing, temp.path()).unwrap(), vec!["EQ2020", "EQ2021"]);
        assert_eq!(
            list_stations(&listing, temp.path(), "EQ2020").unwrap(),
            vec!["STA0", "STA1"]
        );
        assert!(list_stations(&listing, temp.path(), "EQ1999").is_err());
    }

    #[test]
    fn reports_station_layout() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let station = temp.path().join("EQ").join("STA1");
        fs::create_dir_all(station.join("V1")).unwrap();
        fs::create_dir_all(station.join("Trouble").join("V2")).unwrap();

        let layout = station_layout(&FsListing::default(), temp.path(), "EQ", "STA1").unwrap();
        assert_eq!(
            layout,
            StationLayout {
                v1: true,
                v2: false,
                trouble_v1: false,
                trouble_v2: true,
            }
        );
        assert!(layout.has_trouble());

        let missing = station_layout(&FsListing::default(), temp.path(), "EQ", "STA9").unwrap();
        assert!(missing.is_empty());
    }
}
