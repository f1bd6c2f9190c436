/// Placeholder substituted with the license key in URL templates.
pub const LICENSE_PLACEHOLDER: &str = "__LICENSE__";

const DEFAULT_ARCHIVE_URL: &str = "https://download.maxmind.com/app/geoip_download?edition_id=GeoLite2-Country&license_key=__LICENSE__&suffix=tar.gz";
const DEFAULT_HASH_URL: &str = "https://download.maxmind.com/app/geoip_download?edition_id=GeoLite2-Country&license_key=__LICENSE__&suffix=tar.gz.sha256";

/// URL templates for the database archive and its hash manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplates {
    pub archive: String,
    pub hash: String,
}

impl Default for UrlTemplates {
    fn default() -> Self {
        Self {
            archive: DEFAULT_ARCHIVE_URL.to_owned(),
            hash: DEFAULT_HASH_URL.to_owned(),
        }
    }
}

impl UrlTemplates {
    /// Substitute the license key into both templates.
    pub fn resolve(&self, license_key: &str) -> RemoteUrls {
        RemoteUrls {
            archive: LicensedUrl::new(&self.archive, license_key),
            hash: LicensedUrl::new(&self.hash, license_key),
        }
    }
}

/// A URL with the license key filled in.
///
/// `Display` shows the template so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct LicensedUrl {
    url: String,
    template: String,
}

impl LicensedUrl {
    pub fn new(template: &str, license_key: &str) -> Self {
        Self {
            url: template.replace(LICENSE_PLACEHOLDER, license_key),
            template: template.to_owned(),
        }
    }

    /// The URL to request.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for LicensedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}

impl std::fmt::Debug for LicensedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LicensedUrl").field(&self.template).finish()
    }
}

/// Resolved URLs for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrls {
    pub archive: LicensedUrl,
    pub hash: LicensedUrl,
}
