use std::collections::HashMap;

use serde::Deserialize;

/// The official version manifest: the `latest` pointers plus every
/// published version, newest first. Unknown fields are ignored on decode.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionsManifest {
    pub latest: ManifestLatest,
    pub versions: Vec<ManifestVersion>,
}

impl VersionsManifest {
    /// Looks up a version by its exact id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ManifestVersion> {
        self.versions.iter().find(|version| version.id == id)
    }

    /// Resolves the `latest` pointers against the version list. With
    /// snapshots included the snapshot pointer wins, falling back to the
    /// release pointer when its id is missing from the list.
    #[must_use]
    pub fn latest_release(&self, include_snapshots: bool) -> Option<&ManifestVersion> {
        if include_snapshots {
            self.find(&self.latest.snapshot)
                .or_else(|| self.find(&self.latest.release))
        } else {
            self.find(&self.latest.release)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestLatest {
    pub release: String,
    pub snapshot: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[allow(dead_code)]
pub struct ManifestVersion {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    pub url: String,
    pub time: String,
    #[serde(rename = "releaseTime")]
    pub release_time: String,
    pub sha1: String,
    #[serde(rename = "complianceLevel")]
    pub compliance_level: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

/// The asset index of one version: asset path -> content descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsManifest {
    pub objects: HashMap<String, AssetData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct AssetData {
    pub hash: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MANIFEST: &str = r#"{
        "latest": {"release": "1.21", "snapshot": "24w33a"},
        "versions": [
            {
                "id": "24w33a",
                "type": "snapshot",
                "url": "https://piston-meta.mojang.com/v1/packages/aa/24w33a.json",
                "time": "2024-08-15T12:24:31+00:00",
                "releaseTime": "2024-08-15T12:14:33+00:00",
                "sha1": "8c5b4a0ea3d7499995335f9c871fbcc00cfc3335",
                "complianceLevel": 1,
                "futureField": true
            },
            {
                "id": "1.21",
                "type": "release",
                "url": "https://piston-meta.mojang.com/v1/packages/bb/1.21.json",
                "time": "2024-06-13T08:32:38+00:00",
                "releaseTime": "2024-06-13T08:24:03+00:00",
                "sha1": "59353fb40c36d304f2035d51e7d6e6baa98dc05c",
                "complianceLevel": 1
            },
            {
                "id": "b1.8.1",
                "type": "old_beta",
                "url": "https://piston-meta.mojang.com/v1/packages/cc/b1.8.1.json",
                "time": "2011-09-19T12:00:00+00:00",
                "releaseTime": "2011-09-18T22:00:00+00:00",
                "sha1": "0538c42cf2f7cdb693a878816e44e6956bbc3d18",
                "complianceLevel": 0
            }
        ],
        "unknownTopLevel": 42
    }"#;

    fn sample() -> VersionsManifest {
        serde_json::from_str(SAMPLE_MANIFEST).unwrap()
    }

    #[test]
    fn decodes_manifest_ignoring_unknown_fields() {
        let manifest = sample();
        assert_eq!(manifest.latest.release, "1.21");
        assert_eq!(manifest.versions.len(), 3);
        assert_eq!(manifest.versions[0].id, "24w33a");
        assert_eq!(manifest.versions[0].version_type, VersionType::Snapshot);
        assert_eq!(manifest.versions[2].version_type, VersionType::OldBeta);
        assert_eq!(manifest.versions[1].compliance_level, 1);
        assert_eq!(manifest.versions[1].release_time, "2024-06-13T08:24:03+00:00");
    }

    #[test]
    fn finds_versions_by_exact_id() {
        let manifest = sample();
        assert_eq!(manifest.find("1.21").map(|v| v.id.as_str()), Some("1.21"));
        assert!(manifest.find("1.2").is_none());
    }

    #[test]
    fn resolves_latest_pointers() {
        let manifest = sample();
        assert_eq!(
            manifest.latest_release(false).map(|v| v.id.as_str()),
            Some("1.21")
        );
        assert_eq!(
            manifest.latest_release(true).map(|v| v.id.as_str()),
            Some("24w33a")
        );
    }

    #[test]
    fn latest_falls_back_to_release_pointer() {
        let mut manifest = sample();
        manifest.latest.snapshot = "not-in-list".into();
        assert_eq!(
            manifest.latest_release(true).map(|v| v.id.as_str()),
            Some("1.21")
        );
    }

    #[test]
    fn decodes_assets_manifest() {
        let raw = r#"{
            "objects": {
                "icons/icon_16x16.png": {"hash": "bdf48ef6b5d0d23bbb02e17d04865216179f510a", "size": 3665},
                "minecraft/sounds/ambient/cave/cave1.ogg": {"hash": "8201e7c5e9b1e9b1c9c0ba5c95ca2b34aa22d77b", "size": 62548}
            }
        }"#;
        let manifest: AssetsManifest = serde_json::from_str(raw).unwrap();
        assert_eq!(manifest.objects.len(), 2);
        let icon = &manifest.objects["icons/icon_16x16.png"];
        assert_eq!(icon.hash, "bdf48ef6b5d0d23bbb02e17d04865216179f510a");
        assert_eq!(icon.size, 3665);
    }
}
