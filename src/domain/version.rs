use crate::constraint::Constraint;
use crate::domain::field::Field;
use crate::domain::prerelease::Identifiers;
use crate::error::{Result, SemVersionError};
use crate::grammar::Sections;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const MAP_KEYS: [&str; 6] = ["major", "minor", "patch", "pre", "prerelease", "metadata"];

/// Semantic version representation
///
/// Ordering and equality follow SemVer precedence: metadata is carried and
/// rendered but never compared.
#[derive(Debug, Clone)]
pub struct SemVersion {
    major: u32,
    minor: u32,
    patch: u32,
    prerelease: Option<Identifiers>,
    metadata: Option<Identifiers>,
}

/// The shapes a version can be built from
#[derive(Debug, Clone, PartialEq)]
pub enum VersionInput {
    /// `MAJOR.MINOR.PATCH[-PRERELEASE][+METADATA]`
    Text(String),
    /// `[major, minor, patch, prerelease?, metadata?]`
    Parts(Vec<Field>),
    /// Keys `major`, `minor`, `patch`, `pre` or `prerelease`, `metadata`
    Map(BTreeMap<String, Field>),
}

impl SemVersion {
    /// Build a version from any supported input shape
    pub fn new(input: impl Into<VersionInput>) -> Result<Self> {
        match input.into() {
            VersionInput::Text(text) => Self::parse(&text),
            VersionInput::Parts(parts) => Self::from_parts(&parts),
            VersionInput::Map(map) => Self::from_map(&map),
        }
    }

    /// Parse a version string (e.g., "1.2.3-rc.1+build.5")
    pub fn parse(text: &str) -> Result<Self> {
        let sections = Sections::scan(text).ok_or_else(|| {
            tracing::debug!(input = text, "rejected malformed version string");
            SemVersionError::field("version", text, "is not a valid semantic version")
        })?;

        Ok(SemVersion {
            major: sections.major,
            minor: sections.minor,
            patch: sections.patch,
            prerelease: sections.prerelease.map(Identifiers::parse).transpose()?,
            metadata: sections.metadata.map(Identifiers::parse).transpose()?,
        })
    }

    /// Build a version from 3 to 5 positional components
    ///
    /// # Example
    /// ```ignore
    /// let v = SemVersion::from_parts(&[1.into(), 2.into(), 3.into(), Field::Nil, "b.7".into()])?;
    /// assert_eq!(v.to_string(), "1.2.3+b.7");
    /// ```
    pub fn from_parts(parts: &[Field]) -> Result<Self> {
        if !(3..=5).contains(&parts.len()) {
            tracing::debug!(arity = parts.len(), "rejected positional version");
            return Err(SemVersionError::invalid(format!(
                "expected 3 to 5 version components, got {}",
                parts.len()
            )));
        }

        let nil = Field::Nil;
        Ok(SemVersion {
            major: parts[0].to_number("major")?,
            minor: parts[1].to_number("minor")?,
            patch: parts[2].to_number("patch")?,
            prerelease: identifiers(parts.get(3).unwrap_or(&nil), "prerelease")?,
            metadata: identifiers(parts.get(4).unwrap_or(&nil), "metadata")?,
        })
    }

    /// Build a version from a keyed map
    ///
    /// `pre` and `prerelease` are synonyms; `pre` wins when both are present.
    pub fn from_map(map: &BTreeMap<String, Field>) -> Result<Self> {
        if let Some(key) = map.keys().find(|k| !MAP_KEYS.contains(&k.as_str())) {
            return Err(SemVersionError::field("key", key, "is not a version field"));
        }

        let required = |key: &str| -> Result<u32> {
            map.get(key)
                .ok_or_else(|| SemVersionError::invalid(format!("missing required key '{}'", key)))?
                .to_number(key)
        };
        let nil = Field::Nil;
        let pre = map.get("pre").or_else(|| map.get("prerelease")).unwrap_or(&nil);

        Ok(SemVersion {
            major: required("major")?,
            minor: required("minor")?,
            patch: required("patch")?,
            prerelease: identifiers(pre, "prerelease")?,
            metadata: identifiers(map.get("metadata").unwrap_or(&nil), "metadata")?,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Prerelease identifiers, if any
    pub fn pre(&self) -> Option<&str> {
        self.prerelease.as_ref().map(Identifiers::as_str)
    }

    /// Alias of [`SemVersion::pre`]
    pub fn prerelease(&self) -> Option<&str> {
        self.pre()
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_ref().map(Identifiers::as_str)
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    pub fn set_major(&mut self, value: impl Into<Field>) -> Result<()> {
        self.major = number(value.into(), "major")?;
        Ok(())
    }

    pub fn set_minor(&mut self, value: impl Into<Field>) -> Result<()> {
        self.minor = number(value.into(), "minor")?;
        Ok(())
    }

    pub fn set_patch(&mut self, value: impl Into<Field>) -> Result<()> {
        self.patch = number(value.into(), "patch")?;
        Ok(())
    }

    /// Replace or clear (`Field::Nil`) the prerelease
    pub fn set_pre(&mut self, value: impl Into<Field>) -> Result<()> {
        self.prerelease = identifiers(&value.into(), "prerelease")?;
        Ok(())
    }

    /// Alias of [`SemVersion::set_pre`]
    pub fn set_prerelease(&mut self, value: impl Into<Field>) -> Result<()> {
        self.set_pre(value)
    }

    /// Replace or clear (`Field::Nil`) the metadata
    pub fn set_metadata(&mut self, value: impl Into<Field>) -> Result<()> {
        self.metadata = identifiers(&value.into(), "metadata")?;
        Ok(())
    }

    /// `[major, minor, patch, pre?, metadata?]`
    ///
    /// Trailing absent sections are dropped; an absent prerelease before a
    /// present metadata is kept as `Field::Nil`.
    pub fn to_array(&self) -> Vec<Field> {
        let mut parts = vec![
            Field::from(self.major),
            Field::from(self.minor),
            Field::from(self.patch),
        ];
        if self.prerelease.is_some() || self.metadata.is_some() {
            parts.push(Field::from(self.pre()));
        }
        if let Some(metadata) = self.metadata() {
            parts.push(Field::from(metadata));
        }
        parts
    }

    /// Keyed form; `pre` and `metadata` keys are omitted when absent
    pub fn to_map(&self) -> BTreeMap<String, Field> {
        let mut map = BTreeMap::new();
        map.insert("major".to_string(), Field::from(self.major));
        map.insert("minor".to_string(), Field::from(self.minor));
        map.insert("patch".to_string(), Field::from(self.patch));
        if let Some(pre) = self.pre() {
            map.insert("pre".to_string(), Field::from(pre));
        }
        if let Some(metadata) = self.metadata() {
            map.insert("metadata".to_string(), Field::from(metadata));
        }
        map
    }

    /// Whether this version satisfies a constraint such as `">= 1.2"` or `"~> 2.2.0"`
    pub fn satisfies(&self, constraint: &str) -> Result<bool> {
        Ok(Constraint::parse(constraint)?.matches(self))
    }

    /// Next release for the given bump type
    ///
    /// Lower components reset to 0; prerelease and metadata are dropped.
    pub fn bump(&self, bump_type: &VersionBump) -> Self {
        let (major, minor, patch) = match bump_type {
            VersionBump::Major => (self.major.saturating_add(1), 0, 0),
            VersionBump::Minor => (self.major, self.minor.saturating_add(1), 0),
            VersionBump::Patch => (self.major, self.minor, self.patch.saturating_add(1)),
        };
        SemVersion::from_triple(major, minor, patch)
    }

    pub(crate) fn from_triple(major: u32, minor: u32, patch: u32) -> Self {
        SemVersion {
            major,
            minor,
            patch,
            prerelease: None,
            metadata: None,
        }
    }

    pub(crate) fn with_sections(
        mut self,
        prerelease: Option<Identifiers>,
        metadata: Option<Identifiers>,
    ) -> Self {
        self.prerelease = prerelease;
        self.metadata = metadata;
        self
    }
}

fn number(value: Field, name: &str) -> Result<u32> {
    value.to_number(name).inspect_err(|_| {
        tracing::debug!(component = name, %value, "rejected numeric component");
    })
}

fn identifiers(value: &Field, name: &str) -> Result<Option<Identifiers>> {
    value.to_identifiers(name).inspect_err(|_| {
        tracing::debug!(component = name, %value, "rejected identifier sequence");
    })
}

/// Build a version from any supported input shape; same as [`SemVersion::new`]
pub fn sem_version(input: impl Into<VersionInput>) -> Result<SemVersion> {
    SemVersion::new(input)
}

impl fmt::Display for SemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(metadata) = &self.metadata {
            write!(f, "+{}", metadata)?;
        }
        Ok(())
    }
}

impl Ord for SemVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                // A release outranks any prerelease of the same triple
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for SemVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemVersion {}

impl Hash for SemVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease.hash(state);
    }
}

impl FromStr for SemVersion {
    type Err = SemVersionError;

    fn from_str(s: &str) -> Result<Self> {
        SemVersion::parse(s)
    }
}

impl TryFrom<&str> for SemVersion {
    type Error = SemVersionError;

    fn try_from(s: &str) -> Result<Self> {
        SemVersion::parse(s)
    }
}

impl TryFrom<String> for SemVersion {
    type Error = SemVersionError;

    fn try_from(s: String) -> Result<Self> {
        SemVersion::parse(&s)
    }
}

impl From<&str> for VersionInput {
    fn from(s: &str) -> Self {
        VersionInput::Text(s.to_string())
    }
}

impl From<String> for VersionInput {
    fn from(s: String) -> Self {
        VersionInput::Text(s)
    }
}

impl From<Vec<Field>> for VersionInput {
    fn from(parts: Vec<Field>) -> Self {
        VersionInput::Parts(parts)
    }
}

impl From<&[Field]> for VersionInput {
    fn from(parts: &[Field]) -> Self {
        VersionInput::Parts(parts.to_vec())
    }
}

impl From<BTreeMap<String, Field>> for VersionInput {
    fn from(map: BTreeMap<String, Field>) -> Self {
        VersionInput::Map(map)
    }
}

impl From<HashMap<String, Field>> for VersionInput {
    fn from(map: HashMap<String, Field>) -> Self {
        VersionInput::Map(map.into_iter().collect())
    }
}

impl Serialize for SemVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Text(String),
    Map(BTreeMap<String, Field>),
}

impl<'de> Deserialize<'de> for SemVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let input = match VersionRepr::deserialize(deserializer)? {
            VersionRepr::Text(text) => VersionInput::Text(text),
            VersionRepr::Map(map) => VersionInput::Map(map),
        };
        SemVersion::new(input).map_err(serde::de::Error::custom)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemVersion {
        SemVersion::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let v = v("1.2.3-pre.4+metadata.5");
        assert_eq!(v.major(), 1);
        assert_eq!(v.minor(), 2);
        assert_eq!(v.patch(), 3);
        assert_eq!(v.pre(), Some("pre.4"));
        assert_eq!(v.prerelease(), Some("pre.4"));
        assert_eq!(v.metadata(), Some("metadata.5"));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(SemVersion::parse("1.2").is_err());
        assert!(SemVersion::parse("1.2.3.4").is_err());
        assert!(SemVersion::parse("v1.2.3").is_err());
        assert!(SemVersion::parse("1.2.x").is_err());
    }

    #[test]
    fn test_version_parse_error_names_input() {
        let err = SemVersion::parse("1.2.x").unwrap_err();
        assert!(err.to_string().contains("1.2.x"));
    }

    #[test]
    fn test_section_order_tolerance() {
        let v = v("2.1.9+a.b-c.0");
        assert_eq!(v.pre(), None);
        assert_eq!(v.metadata(), Some("a.b-c.0"));
        assert_eq!(SemVersion::parse(&v.to_string()).unwrap().metadata(), v.metadata());
    }

    #[test]
    fn test_hyphenated_metadata_round_trips() {
        let built = SemVersion::from_parts(&[1.into(), 0.into(), 0.into(), Field::Nil, "a-b".into()])
            .unwrap();
        let parsed = SemVersion::parse(&built.to_string()).unwrap();
        assert_eq!(parsed.pre(), None);
        assert_eq!(parsed.metadata(), Some("a-b"));
        assert_eq!(parsed, built);

        let mut edited = v("1.0.0");
        edited.set_metadata("build-7").unwrap();
        let parsed = SemVersion::parse(&edited.to_string()).unwrap();
        assert_eq!(parsed.pre(), None);
        assert_eq!(parsed, edited);
    }

    #[test]
    fn test_from_parts() {
        let v = SemVersion::from_parts(&[1.into(), 2.into(), 3.into()]).unwrap();
        assert_eq!(v.to_string(), "1.2.3");

        let v = SemVersion::from_parts(&[1.into(), 2.into(), 3.into(), "rc.1".into()]).unwrap();
        assert_eq!(v.to_string(), "1.2.3-rc.1");
    }

    #[test]
    fn test_from_parts_nil_prerelease_with_metadata() {
        let v = SemVersion::from_parts(&[1.into(), 2.into(), 3.into(), Field::Nil, "b.7".into()])
            .unwrap();
        assert_eq!(v.pre(), None);
        assert_eq!(v.metadata(), Some("b.7"));
        assert_eq!(v.to_string(), "1.2.3+b.7");
    }

    #[test]
    fn test_from_parts_numeric_strings() {
        let v = SemVersion::from_parts(&["4".into(), "0".into(), "12".into()]).unwrap();
        assert_eq!(v, SemVersion::from_triple(4, 0, 12));
    }

    #[test]
    fn test_from_parts_wrong_arity() {
        assert!(SemVersion::from_parts(&[3.into()]).is_err());
        assert!(SemVersion::from_parts(&[3.into(), 4.into()]).is_err());
        let six: Vec<Field> = vec![
            1.into(),
            2.into(),
            3.into(),
            "a".into(),
            "b".into(),
            "c".into(),
        ];
        assert!(SemVersion::from_parts(&six).is_err());
    }

    #[test]
    fn test_from_parts_bad_components() {
        assert!(SemVersion::from_parts(&[(-1).into(), 2.into(), 3.into()]).is_err());
        assert!(SemVersion::from_parts(&[1.into(), "x".into(), 3.into()]).is_err());
        assert!(SemVersion::from_parts(&[1.into(), 2.into(), 3.into(), "a!".into()]).is_err());
        let numeric_metadata = [1.into(), 2.into(), 3.into(), Field::Nil, 5.into()];
        assert!(SemVersion::from_parts(&numeric_metadata).is_err());
    }

    #[test]
    fn test_from_map() {
        let mut map = BTreeMap::new();
        map.insert("major".to_string(), Field::from(1));
        map.insert("minor".to_string(), Field::from(2));
        map.insert("patch".to_string(), Field::from(3));
        map.insert("prerelease".to_string(), Field::from("beta"));
        let v = SemVersion::from_map(&map).unwrap();
        assert_eq!(v.to_string(), "1.2.3-beta");

        map.insert("pre".to_string(), Field::from("rc"));
        assert_eq!(SemVersion::from_map(&map).unwrap().pre(), Some("rc"));
    }

    #[test]
    fn test_from_map_missing_and_unknown_keys() {
        let mut map = BTreeMap::new();
        map.insert("major".to_string(), Field::from(1));
        map.insert("minor".to_string(), Field::from(2));
        let err = SemVersion::from_map(&map).unwrap_err();
        assert!(err.to_string().contains("patch"));

        map.insert("patch".to_string(), Field::from(3));
        map.insert("build".to_string(), Field::from("x"));
        let err = SemVersion::from_map(&map).unwrap_err();
        assert!(err.to_string().contains("build"));
    }

    #[test]
    fn test_setters_accept_valid_values() {
        let mut v = v("1.2.3");
        v.set_major(7).unwrap();
        v.set_minor("8").unwrap();
        v.set_patch(9u32).unwrap();
        v.set_pre("alpha.1").unwrap();
        v.set_metadata("sha.abc").unwrap();
        assert_eq!(v.to_string(), "7.8.9-alpha.1+sha.abc");

        v.set_prerelease(Field::Nil).unwrap();
        v.set_metadata(None::<&str>).unwrap();
        assert_eq!(v.to_string(), "7.8.9");
    }

    #[test]
    fn test_setters_reject_and_leave_unchanged() {
        let mut v = v("1.2.3-rc.1+m");
        assert!(v.set_major(-1).is_err());
        assert!(v.set_minor("1.5").is_err());
        assert!(v.set_patch(Field::Nil).is_err());
        assert!(v.set_pre("rc..1").is_err());
        assert!(v.set_pre(4).is_err());
        assert!(v.set_metadata("a b").is_err());
        assert_eq!(v.to_string(), "1.2.3-rc.1+m");
    }

    #[test]
    fn test_to_array() {
        assert_eq!(
            v("1.2.3-pre.4+metadata.5").to_array(),
            vec![
                Field::Int(1),
                Field::Int(2),
                Field::Int(3),
                Field::from("pre.4"),
                Field::from("metadata.5"),
            ]
        );
        assert_eq!(v("1.2.3").to_array().len(), 3);
        assert_eq!(v("1.2.3-a").to_array().len(), 4);
        assert_eq!(v("1.2.3+m").to_array()[3], Field::Nil);
    }

    #[test]
    fn test_to_map_omits_absent_sections() {
        let map = v("1.2.3").to_map();
        assert_eq!(map.len(), 3);
        assert!(!map.contains_key("pre"));
        assert!(!map.contains_key("metadata"));

        let map = v("1.2.3-pre.4+metadata.5").to_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map["pre"], Field::from("pre.4"));
        assert_eq!(map["metadata"], Field::from("metadata.5"));
    }

    #[test]
    fn test_map_round_trip() {
        let original = v("0.9.1-x.7+y");
        assert_eq!(SemVersion::from_map(&original.to_map()).unwrap(), original);
        assert_eq!(SemVersion::from_parts(&original.to_array()).unwrap(), original);
    }

    #[test]
    fn test_ordering() {
        assert!(v("1.0.0") < v("2.0.0"));
        assert!(v("2.0.0") < v("2.1.0"));
        assert!(v("2.1.0") < v("2.1.1"));
        assert!(v("1.0.0-alpha") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert!(v("1.0.0-alpha.1") < v("1.0.0-alpha.beta"));
        assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
        assert!(v("1.0.0-rc.1") < v("1.0.0"));
    }

    #[test]
    fn test_metadata_ignored_in_comparison() {
        assert_eq!(v("1.0.0+X"), v("1.0.0+Y"));
        assert_eq!(v("1.0.0+X"), v("1.0.0"));
        assert_eq!(v("1.0.0-a+X").cmp(&v("1.0.0-a")), Ordering::Equal);
    }

    #[test]
    fn test_version_bump() {
        let v = v("1.2.3-rc.1+meta");
        assert_eq!(v.bump(&VersionBump::Major).to_string(), "2.0.0");
        assert_eq!(v.bump(&VersionBump::Minor).to_string(), "1.3.0");
        assert_eq!(v.bump(&VersionBump::Patch).to_string(), "1.2.4");
    }

    #[test]
    fn test_sem_version_alias() {
        assert_eq!(sem_version("1.2.3").unwrap(), SemVersion::new("1.2.3").unwrap());
        assert_eq!(
            sem_version(vec![Field::from(1), Field::from(2), Field::from(3)]).unwrap(),
            v("1.2.3")
        );
        assert!(sem_version("nope").is_err());
    }
}
