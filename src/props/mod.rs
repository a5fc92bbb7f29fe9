//! Unicode properties.
//!
//! Property data is not part of this crate's core: a [`PropertyResolver`]
//! supplies the name lookups and per-code-point values, and this module turns
//! a `Property=Value` query into a set of code points. With the `ucd` feature
//! (enabled by default) a resolver backed by the Unicode tables of
//! `regex-syntax` is installed as the process-wide default.
//!
//! Building a set from a property evaluates the property only at the code
//! points where its value may change (the *start points* of the property's
//! source). Start points of the default resolver are cached per source for the
//! lifetime of the process; [`set_default_resolver`] invalidates the cache.

pub mod case;
#[cfg(feature = "ucd")]
pub mod ucd;

use std::{
    collections::HashMap,
    fmt::Display,
    str::FromStr,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use log::{debug, trace};

use crate::{inversion::InversionList, Error, Result, HIGH, MAX_CODE_POINT};

/// How the values of a property are looked up and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A boolean property; values are `0` and `1`.
    Binary,
    /// A property with enumerated integer values compared for equality.
    Enumerated,
    /// A property whose per-code-point value is a bit mask and whose values
    /// may name several bits at once (the general category and its groups).
    Mask,
    /// Canonical combining class; numeric values `0..=255` are accepted in
    /// addition to value names.
    CombiningClass,
    /// Numeric value, compared as `f64`.
    Numeric,
    /// Character name, looked up with [`PropertyResolver::code_point_from_name`].
    Name,
    /// Version of first assignment, matched cumulatively.
    Age,
    /// Script extensions, tested with [`PropertyResolver::has_script_extension`].
    ScriptExtensions,
}

/// A property as identified by a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Property {
    /// The resolver-specific identifier.
    pub id: u32,
    pub kind: PropertyKind,
}

impl Property {
    pub fn new(id: u32, kind: PropertyKind) -> Self {
        Property { id, kind }
    }
}

/// Identifies the data a property is derived from. Properties sharing a
/// source share their start points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertySource(pub u32);

/// A Unicode version such as `3.2` or `6.0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub micro: u8,
    pub patch: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Version {
            major,
            minor,
            micro: 0,
            patch: 0,
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    /// Parses one to four dot-separated numbers.
    ///
    /// # Example
    /// ```
    /// use uniset::props::Version;
    ///
    /// let v: Version = "3.2".parse().unwrap();
    /// assert_eq!(v, Version::new(3, 2));
    /// assert!("3.2.x".parse::<Version>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let mut fields = [0u8; 4];
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() > 4 {
            return Err(Error::unknown_property("age", s));
        }
        for (field, part) in fields.iter_mut().zip(parts) {
            *field = part
                .parse()
                .map_err(|_| Error::unknown_property("age", s))?;
        }
        let [major, minor, micro, patch] = fields;
        Ok(Version {
            major,
            minor,
            micro,
            patch,
        })
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.micro != 0 || self.patch != 0 {
            write!(f, ".{}", self.micro)?;
        }
        if self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

/// The property database consulted for property clauses.
///
/// Implementations must be immutable (or internally synchronized): the
/// default resolver is shared by all threads.
pub trait PropertyResolver: Send + Sync {
    /// Resolves a property name or alias.
    fn property(&self, name: &str) -> Option<Property>;

    /// Resolves a value name of an enumerated, binary, mask or combining class
    /// property, and script names for [`PropertyKind::ScriptExtensions`].
    /// For [`PropertyKind::Mask`] properties the result is the value's bit mask.
    fn property_value(&self, property: Property, value: &str) -> Option<i32>;

    /// The value of `property` at `c`. For [`PropertyKind::Mask`] properties
    /// this is the bit of the code point's value.
    fn int_property(&self, c: u32, property: Property) -> i32;

    /// The numeric value of `c`, or NaN if it has none.
    fn numeric_value(&self, _c: u32) -> f64 {
        f64::NAN
    }

    /// The version in which `c` was assigned, or `None` if it is unassigned.
    fn age(&self, _c: u32) -> Option<Version> {
        None
    }

    /// Looks up a code point by its character name.
    fn code_point_from_name(&self, _name: &str) -> Option<u32> {
        None
    }

    /// Check if `script` is among the script extensions of `c`.
    fn has_script_extension(&self, _c: u32, _script: i32) -> bool {
        false
    }

    /// The data source of a property.
    fn source(&self, property: Property) -> PropertySource;

    /// The code points at which a value of any property derived from `source`
    /// may change, in ascending order. The value of such a property is
    /// constant between consecutive start points.
    fn start_points(&self, source: PropertySource) -> Vec<u32>;
}

/// Normalizes a property or value name for loose matching: case, whitespace,
/// underscores and hyphens are ignored.
///
/// # Example
/// ```
/// use uniset::props::normalize_name;
///
/// assert_eq!(normalize_name("White_Space"), "whitespace");
/// assert_eq!(normalize_name("isLatin"), "islatin");
/// assert_eq!(normalize_name("Line Break"), "linebreak");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|&c| !(c == '_' || c == '-' || c.is_whitespace()))
        .flat_map(char::to_lowercase)
        .collect()
}

/* Default resolver and start point cache */

struct DefaultResolver {
    generation: u64,
    resolver: Option<Arc<dyn PropertyResolver>>,
}

static DEFAULT_RESOLVER: RwLock<DefaultResolver> = RwLock::new(DefaultResolver {
    generation: 0,
    resolver: None,
});

#[derive(Default)]
struct Inclusions {
    generation: u64,
    points: HashMap<PropertySource, Arc<[u32]>>,
}

fn inclusions() -> &'static RwLock<Inclusions> {
    static INCLUSIONS: OnceLock<RwLock<Inclusions>> = OnceLock::new();
    INCLUSIONS.get_or_init(|| RwLock::new(Inclusions::default()))
}

#[cfg(feature = "ucd")]
fn builtin_resolver() -> Option<Arc<dyn PropertyResolver>> {
    Some(ucd::UcdResolver::shared())
}

#[cfg(not(feature = "ucd"))]
fn builtin_resolver() -> Option<Arc<dyn PropertyResolver>> {
    None
}

/// Returns the resolver used when none is configured explicitly.
pub fn default_resolver() -> Option<Arc<dyn PropertyResolver>> {
    let default = DEFAULT_RESOLVER
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    default.resolver.clone().or_else(builtin_resolver)
}

/// Replaces the process-wide default resolver. `None` restores the built-in
/// resolver (if the `ucd` feature is enabled). Cached start points are
/// discarded.
pub fn set_default_resolver(resolver: Option<Arc<dyn PropertyResolver>>) {
    let mut default = DEFAULT_RESOLVER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    default.generation += 1;
    default.resolver = resolver;
    let mut cache = inclusions().write().unwrap_or_else(PoisonError::into_inner);
    cache.generation = default.generation;
    cache.points.clear();
    trace!("default property resolver replaced, start point cache cleared");
}

/// Sorts, deduplicates and clamps start points, and makes sure `0` is the first one.
fn normalize_start_points(mut points: Vec<u32>) -> Vec<u32> {
    points.retain(|&p| p <= MAX_CODE_POINT);
    points.push(0);
    points.sort_unstable();
    points.dedup();
    points
}

/// A resolver together with the knowledge whether its start points may be cached.
#[derive(Clone)]
pub(crate) struct Lookup {
    resolver: Arc<dyn PropertyResolver>,
    /// The default resolver generation this lookup was created in, if the
    /// resolver is the process-wide default.
    generation: Option<u64>,
}

impl Lookup {
    /// A lookup through the default resolver.
    pub(crate) fn default_lookup() -> Result<Self> {
        let default = DEFAULT_RESOLVER
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let resolver = default
            .resolver
            .clone()
            .or_else(builtin_resolver)
            .ok_or_else(|| Error::unknown_property("", ""))?;
        Ok(Lookup {
            resolver,
            generation: Some(default.generation),
        })
    }

    /// A lookup through an explicitly configured resolver. Nothing is cached.
    pub(crate) fn custom(resolver: Arc<dyn PropertyResolver>) -> Self {
        Lookup {
            resolver,
            generation: None,
        }
    }

    pub(crate) fn resolver(&self) -> &dyn PropertyResolver {
        self.resolver.as_ref()
    }

    fn start_points(&self, source: PropertySource) -> Arc<[u32]> {
        let Some(generation) = self.generation else {
            return normalize_start_points(self.resolver.start_points(source)).into();
        };
        {
            let cache = inclusions().read().unwrap_or_else(PoisonError::into_inner);
            if cache.generation == generation {
                if let Some(points) = cache.points.get(&source) {
                    return points.clone();
                }
            }
        }
        let points: Arc<[u32]> = normalize_start_points(self.resolver.start_points(source)).into();
        debug!(
            "built start points for property source {:?}: {} points",
            source,
            points.len()
        );
        let mut cache = inclusions().write().unwrap_or_else(PoisonError::into_inner);
        if cache.generation == generation {
            cache.points.insert(source, points.clone());
        }
        points
    }

    /// Builds the set of code points `c` for which `filter(c)` holds. The
    /// filter is evaluated once per start point of `property`'s source.
    fn apply_filter(&self, property: Property, filter: impl Fn(u32) -> bool) -> InversionList {
        let points = self.start_points(self.resolver.source(property));
        trace!(
            "applying filter for property {:?} over {} start points",
            property,
            points.len()
        );
        let mut list = Vec::new();
        let mut inside = false;
        for &p in points.iter() {
            let now = filter(p);
            if now != inside {
                list.push(p);
                inside = now;
            }
        }
        if inside {
            list.push(HIGH);
        }
        list.push(HIGH);
        InversionList::from_boundaries(list)
    }

    /// The set of code points whose value of `property` is `value`.
    pub(crate) fn int_value_set(&self, property: Property, value: i32) -> Result<InversionList> {
        let r = self.resolver();
        let list = match property.kind {
            PropertyKind::Mask => {
                self.apply_filter(property, |c| (r.int_property(c, property) & value) != 0)
            }
            PropertyKind::Binary if value != 0 && value != 1 => InversionList::new(),
            PropertyKind::Binary | PropertyKind::Enumerated | PropertyKind::CombiningClass => {
                self.apply_filter(property, |c| r.int_property(c, property) == value)
            }
            PropertyKind::ScriptExtensions => {
                self.apply_filter(property, |c| r.has_script_extension(c, value))
            }
            PropertyKind::Numeric | PropertyKind::Name | PropertyKind::Age => {
                return Err(Error::unknown_property(
                    &format!("{:?}", property.kind),
                    &value.to_string(),
                ))
            }
        };
        Ok(list)
    }

    /// Resolves `name=value` (or a bare `name` if `value` is empty) into a set of code points.
    ///
    /// A bare name is tried as a general category value, then as a script
    /// value, then as a binary property, and finally as one of the built-in
    /// names `Any`, `ASCII` and `Assigned`.
    pub(crate) fn alias_set(&self, name: &str, value: &str) -> Result<InversionList> {
        let r = self.resolver();
        let unknown = || Error::unknown_property(name, value);
        if !value.is_empty() {
            let property = r.property(name).ok_or_else(unknown)?;
            return match property.kind {
                PropertyKind::Binary | PropertyKind::Enumerated | PropertyKind::Mask => {
                    let v = r.property_value(property, value).ok_or_else(unknown)?;
                    self.int_value_set(property, v)
                }
                PropertyKind::CombiningClass => {
                    let v = match r.property_value(property, value) {
                        Some(v) => v,
                        None => parse_combining_class(value).ok_or_else(unknown)?,
                    };
                    self.int_value_set(property, v)
                }
                PropertyKind::Numeric => {
                    let v: f64 = value.trim().parse().map_err(|_| unknown())?;
                    Ok(self.apply_filter(property, |c| r.numeric_value(c) == v))
                }
                PropertyKind::Name => {
                    let c = r
                        .code_point_from_name(&munge_name(value))
                        .filter(|&c| c <= MAX_CODE_POINT)
                        .ok_or_else(unknown)?;
                    InversionList::from_range(c, c)
                }
                PropertyKind::Age => {
                    let v: Version = value.parse().map_err(|_| unknown())?;
                    Ok(self.apply_filter(property, |c| r.age(c).is_some_and(|a| a <= v)))
                }
                PropertyKind::ScriptExtensions => {
                    let script = r
                        .property("sc")
                        .and_then(|sc| r.property_value(sc, value))
                        .ok_or_else(unknown)?;
                    self.int_value_set(property, script)
                }
            };
        }

        if let Some(list) = self.bare_set(name) {
            return list;
        }
        // `isLatin` and `isWhite_Space` spell `Latin` and `White_Space`.
        let normalized = normalize_name(name);
        match normalized.strip_prefix("is").filter(|rest| !rest.is_empty()) {
            Some(rest) => self.bare_set(rest).unwrap_or_else(|| Err(unknown())),
            None => Err(unknown()),
        }
    }

    /// Resolves a bare name, or returns `None` if nothing is called `name`.
    fn bare_set(&self, name: &str) -> Option<Result<InversionList>> {
        let r = self.resolver();
        if let Some(gc) = r.property("gc").filter(|p| p.kind == PropertyKind::Mask) {
            if let Some(v) = r.property_value(gc, name) {
                return Some(self.int_value_set(gc, v));
            }
        }
        if let Some(sc) = r.property("sc") {
            if let Some(v) = r.property_value(sc, name) {
                return Some(self.int_value_set(sc, v));
            }
        }
        if let Some(p) = r.property(name).filter(|p| p.kind == PropertyKind::Binary) {
            return Some(self.int_value_set(p, 1));
        }
        match normalize_name(name).as_str() {
            "any" => Some(Ok(InversionList::all())),
            "ascii" => Some(InversionList::from_range(0u32, 0x7Fu32)),
            "assigned" => {
                let gc = r.property("gc").filter(|p| p.kind == PropertyKind::Mask)?;
                let unassigned = r.property_value(gc, "Cn")?;
                Some(self.int_value_set(gc, unassigned).map(|mut list| {
                    list.complement();
                    list
                }))
            }
            _ => None,
        }
    }
}

/// Parses a numeric canonical combining class.
fn parse_combining_class(value: &str) -> Option<i32> {
    let v: f64 = value.trim().parse().ok()?;
    if v.fract() == 0.0 && (0.0..=255.0).contains(&v) {
        Some(v as i32)
    } else {
        None
    }
}

/// Trims a character name and collapses runs of white space into one space.
fn munge_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ErrorKind;

    /// A resolver over a handful of made-up properties, used where the built-in
    /// tables lack data (names, numeric combining classes) or to observe caching.
    #[derive(Debug, Default)]
    pub(crate) struct TestResolver;

    pub(crate) const GC: u32 = 0;
    pub(crate) const SC: u32 = 1;
    pub(crate) const CCC: u32 = 2;
    pub(crate) const NAME: u32 = 3;
    pub(crate) const AGE: u32 = 4;
    pub(crate) const NV: u32 = 5;
    pub(crate) const SCX: u32 = 6;
    pub(crate) const VOWEL: u32 = 7;

    // General categories: 1 = letter (a-z, A-Z), 2 = digit, 0 = other.
    fn gc_of(c: u32) -> i32 {
        match char::from_u32(c) {
            Some(c) if c.is_ascii_alphabetic() => 1,
            Some(c) if c.is_ascii_digit() => 2,
            _ => 0,
        }
    }

    impl PropertyResolver for TestResolver {
        fn property(&self, name: &str) -> Option<Property> {
            let (id, kind) = match normalize_name(name).as_str() {
                "gc" | "generalcategory" => (GC, PropertyKind::Mask),
                "sc" | "script" => (SC, PropertyKind::Enumerated),
                "ccc" => (CCC, PropertyKind::CombiningClass),
                "na" | "name" => (NAME, PropertyKind::Name),
                "age" => (AGE, PropertyKind::Age),
                "nv" => (NV, PropertyKind::Numeric),
                "scx" => (SCX, PropertyKind::ScriptExtensions),
                "vowel" => (VOWEL, PropertyKind::Binary),
                _ => return None,
            };
            Some(Property::new(id, kind))
        }

        fn property_value(&self, property: Property, value: &str) -> Option<i32> {
            let value = normalize_name(value);
            match (property.id, value.as_str()) {
                (GC, "cn") => Some(1 << 0),
                (GC, "l") => Some(1 << 1),
                (GC, "nd") => Some(1 << 2),
                (SC, "latn") | (SC, "latin") => Some(1),
                (CCC, "above") => Some(230),
                (VOWEL, "y") => Some(1),
                (VOWEL, "n") => Some(0),
                _ => None,
            }
        }

        fn int_property(&self, c: u32, property: Property) -> i32 {
            match property.id {
                GC => 1 << gc_of(c),
                SC => (gc_of(c) == 1) as i32,
                CCC => {
                    if (0x300..0x315).contains(&c) {
                        230
                    } else {
                        0
                    }
                }
                VOWEL => "aeiouAEIOU".contains(char::from_u32(c).unwrap_or('\0')) as i32,
                _ => 0,
            }
        }

        fn numeric_value(&self, c: u32) -> f64 {
            if gc_of(c) == 2 {
                (c - '0' as u32) as f64
            } else {
                f64::NAN
            }
        }

        fn age(&self, c: u32) -> Option<Version> {
            match c {
                0..=0x7F => Some(Version::new(1, 1)),
                0x80..=0xFF => Some(Version::new(2, 0)),
                _ => None,
            }
        }

        fn code_point_from_name(&self, name: &str) -> Option<u32> {
            match name {
                "LATIN SMALL LETTER A" => Some(0x61),
                "SNOWMAN" => Some(0x2603),
                _ => None,
            }
        }

        fn has_script_extension(&self, c: u32, script: i32) -> bool {
            script == 1 && (gc_of(c) == 1 || c == 0xB7)
        }

        fn source(&self, property: Property) -> PropertySource {
            PropertySource(property.id)
        }

        fn start_points(&self, _source: PropertySource) -> Vec<u32> {
            // Every change point of every test property.
            let mut points = vec![0x30, 0x3A, 0x41, 0x5B, 0x61, 0x7B, 0x80, 0xB7, 0xB8, 0x100, 0x300, 0x315, 0x2603];
            points.extend("aeiouAEIOU".chars().flat_map(|c| [c as u32, c as u32 + 1]));
            points.extend(0x30..0x3A);
            points
        }
    }

    pub(crate) fn lookup() -> Lookup {
        Lookup::custom(Arc::new(TestResolver))
    }

    fn ranges(list: &InversionList) -> Vec<(u32, u32)> {
        list.ranges().map(|r| (r.start(), r.end())).collect()
    }

    #[test]
    fn test_mask_property() {
        let set = lookup().alias_set("gc", "L").unwrap();
        assert_eq!(ranges(&set), vec![(0x41, 0x5A), (0x61, 0x7A)]);
    }

    #[test]
    fn test_bare_names() {
        let l = lookup();
        assert_eq!(ranges(&l.alias_set("L", "").unwrap()), vec![(0x41, 0x5A), (0x61, 0x7A)]);
        assert_eq!(ranges(&l.alias_set("Latin", "").unwrap()), vec![(0x41, 0x5A), (0x61, 0x7A)]);
        assert_eq!(l.alias_set("Vowel", "").unwrap().len(), 10);
        assert!(l.alias_set("Any", "").unwrap().is_full());
        assert_eq!(ranges(&l.alias_set("ASCII", "").unwrap()), vec![(0, 0x7F)]);
        // Everything except gc=Cn.
        assert_eq!(
            ranges(&l.alias_set("Assigned", "").unwrap()),
            vec![(0x30, 0x39), (0x41, 0x5A), (0x61, 0x7A)]
        );
    }

    #[test]
    fn test_binary_values() {
        let l = lookup();
        assert_eq!(l.alias_set("vowel", "Y").unwrap().len(), 10);
        let not_vowels = l.alias_set("vowel", "N").unwrap();
        assert!(!not_vowels.contains('a'));
        assert!(not_vowels.contains('b'));
    }

    #[test]
    fn test_combining_class() {
        let l = lookup();
        let above = l.alias_set("ccc", "Above").unwrap();
        assert_eq!(above, l.alias_set("ccc", "230").unwrap());
        assert_eq!(ranges(&above), vec![(0x300, 0x314)]);
        assert!(l.alias_set("ccc", "256").is_err());
        assert!(l.alias_set("ccc", "1.5").is_err());
    }

    #[test]
    fn test_numeric_value() {
        let seven = lookup().alias_set("nv", "7").unwrap();
        assert_eq!(ranges(&seven), vec![(0x37, 0x37)]);
        assert!(lookup().alias_set("nv", "seven").is_err());
    }

    #[test]
    fn test_name() {
        let l = lookup();
        let snowman = l.alias_set("na", "  SNOWMAN ").unwrap();
        assert_eq!(ranges(&snowman), vec![(0x2603, 0x2603)]);
        assert_eq!(ranges(&l.alias_set("na", "LATIN  SMALL LETTER\tA").unwrap()), vec![(0x61, 0x61)]);
        let err = l.alias_set("na", "NO SUCH NAME").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnknownProperty {
                name: "na".into(),
                value: "NO SUCH NAME".into()
            }
        );
    }

    #[test]
    fn test_age_is_cumulative() {
        let l = lookup();
        assert_eq!(ranges(&l.alias_set("age", "1.1").unwrap()), vec![(0, 0x7F)]);
        assert_eq!(ranges(&l.alias_set("age", "2.0").unwrap()), vec![(0, 0xFF)]);
        assert!(l.alias_set("age", "1.0").unwrap().is_empty());
    }

    #[test]
    fn test_script_extensions() {
        let scx = lookup().alias_set("scx", "Latn").unwrap();
        assert!(scx.contains(0xB7u32));
        assert!(scx.contains('q'));
        assert!(!lookup().alias_set("sc", "Latn").unwrap().contains(0xB7u32));
    }

    #[test]
    fn test_unknown() {
        let l = lookup();
        assert!(l.alias_set("NoSuchProperty", "").is_err());
        assert!(l.alias_set("gc", "NoSuchValue").is_err());
        assert!(l.alias_set("NoSuchProperty", "x").is_err());
        assert!(l.int_value_set(Property::new(NV, PropertyKind::Numeric), 1).is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(6, 0).to_string(), "6.0");
        assert_eq!("3.0.1".parse::<Version>().unwrap().to_string(), "3.0.1");
        assert!("1.2.3.4.5".parse::<Version>().is_err());
    }

    #[test]
    fn test_normalize_name_keeps_is() {
        assert_eq!(normalize_name("is"), "is");
        assert_eq!(normalize_name("IS_Greek"), "isgreek");
    }

    #[test]
    fn test_is_prefix_on_bare_names() {
        let l = lookup();
        let letters = vec![(0x41, 0x5A), (0x61, 0x7A)];
        assert_eq!(ranges(&l.alias_set("isLatin", "").unwrap()), letters);
        assert_eq!(ranges(&l.alias_set("is_L", "").unwrap()), letters);
        assert_eq!(l.alias_set("IsVowel", "").unwrap().len(), 10);
        assert!(l.alias_set("is", "").is_err());
        // Values are matched as written.
        assert!(l.alias_set("sc", "isLatin").is_err());
        assert!(l.alias_set("gc", "isL").is_err());
    }
}
