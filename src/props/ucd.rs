//! A property resolver backed by the Unicode tables of `regex-syntax`.
//!
//! Supported properties are the general category (with the usual groups such
//! as `L` or `P`), `Script`, `Script_Extensions`, `Age`, the binary properties
//! known to `regex-syntax`, and `Numeric_Value` for decimal digits. Character
//! names are not available; `\N{...}` needs a custom resolver.

use std::sync::{Arc, OnceLock};

use log::{debug, trace};
use regex_syntax::{
    hir::{Class, HirKind},
    ParserBuilder,
};

use super::{normalize_name, Property, PropertyKind, PropertyResolver, PropertySource, Version};
use crate::{inversion::InversionList, CodePointRange};

const GC: u32 = 0;
const SC: u32 = 1;
const SCX: u32 = 2;
const AGE: u32 = 3;
const NV: u32 = 4;
const NA: u32 = 5;
const BINARY: u32 = 0x100;

/// General categories in their conventional numbering. `Cn` is the value of
/// every code point not covered by another category.
const CATEGORIES: [(&str, &str); 30] = [
    ("Cn", "Unassigned"),
    ("Lu", "Uppercase_Letter"),
    ("Ll", "Lowercase_Letter"),
    ("Lt", "Titlecase_Letter"),
    ("Lm", "Modifier_Letter"),
    ("Lo", "Other_Letter"),
    ("Mn", "Nonspacing_Mark"),
    ("Me", "Enclosing_Mark"),
    ("Mc", "Spacing_Mark"),
    ("Nd", "Decimal_Number"),
    ("Nl", "Letter_Number"),
    ("No", "Other_Number"),
    ("Zs", "Space_Separator"),
    ("Zl", "Line_Separator"),
    ("Zp", "Paragraph_Separator"),
    ("Cc", "Control"),
    ("Cf", "Format"),
    ("Co", "Private_Use"),
    ("Cs", "Surrogate"),
    ("Pd", "Dash_Punctuation"),
    ("Ps", "Open_Punctuation"),
    ("Pe", "Close_Punctuation"),
    ("Pc", "Connector_Punctuation"),
    ("Po", "Other_Punctuation"),
    ("Sm", "Math_Symbol"),
    ("Sc", "Currency_Symbol"),
    ("Sk", "Modifier_Symbol"),
    ("So", "Other_Symbol"),
    ("Pi", "Initial_Punctuation"),
    ("Pf", "Final_Punctuation"),
];

const ND: u16 = 9;
const CS: u16 = 18;

const fn mask(categories: &[u16]) -> i32 {
    let mut m = 0;
    let mut i = 0;
    while i < categories.len() {
        m |= 1 << categories[i];
        i += 1;
    }
    m
}

/// Category groups and further aliases.
const CATEGORY_GROUPS: [(&str, &str, i32); 12] = [
    ("L", "Letter", mask(&[1, 2, 3, 4, 5])),
    ("LC", "Cased_Letter", mask(&[1, 2, 3])),
    ("M", "Mark", mask(&[6, 7, 8])),
    ("M", "Combining_Mark", mask(&[6, 7, 8])),
    ("N", "Number", mask(&[9, 10, 11])),
    ("Z", "Separator", mask(&[12, 13, 14])),
    ("C", "Other", mask(&[0, 15, 16, 17, 18])),
    ("P", "Punctuation", mask(&[19, 20, 21, 22, 23, 28, 29])),
    ("P", "punct", mask(&[19, 20, 21, 22, 23, 28, 29])),
    ("S", "Symbol", mask(&[24, 25, 26, 27])),
    ("Nd", "digit", mask(&[9])),
    ("Cc", "cntrl", mask(&[15])),
];

/// Scripts by long name. Index 0 is `Unknown`, the script of every code point
/// not covered by another script.
const SCRIPTS: &[&str] = &[
    "Unknown", "Adlam", "Ahom", "Anatolian_Hieroglyphs", "Arabic", "Armenian", "Avestan",
    "Balinese", "Bamum", "Bassa_Vah", "Batak", "Bengali", "Bhaiksuki", "Bopomofo", "Brahmi",
    "Braille", "Buginese", "Buhid", "Canadian_Aboriginal", "Carian", "Caucasian_Albanian",
    "Chakma", "Cham", "Cherokee", "Chorasmian", "Common", "Coptic", "Cuneiform", "Cypriot",
    "Cypro_Minoan", "Cyrillic", "Deseret", "Devanagari", "Dives_Akuru", "Dogra", "Duployan",
    "Egyptian_Hieroglyphs", "Elbasan", "Elymaic", "Ethiopic", "Garay", "Georgian", "Glagolitic",
    "Gothic", "Grantha", "Greek", "Gujarati", "Gunjala_Gondi", "Gurmukhi", "Gurung_Khema", "Han",
    "Hangul", "Hanifi_Rohingya", "Hanunoo", "Hatran", "Hebrew", "Hiragana", "Imperial_Aramaic",
    "Inherited", "Inscriptional_Pahlavi", "Inscriptional_Parthian", "Javanese", "Kaithi",
    "Kannada", "Katakana", "Kawi", "Kayah_Li", "Kharoshthi", "Khitan_Small_Script", "Khmer",
    "Khojki", "Khudawadi", "Kirat_Rai", "Lao", "Latin", "Lepcha", "Limbu", "Linear_A", "Linear_B",
    "Lisu", "Lycian", "Lydian", "Mahajani", "Makasar", "Malayalam", "Mandaic", "Manichaean",
    "Marchen", "Masaram_Gondi", "Medefaidrin", "Meetei_Mayek", "Mende_Kikakui",
    "Meroitic_Cursive", "Meroitic_Hieroglyphs", "Miao", "Modi", "Mongolian", "Mro", "Multani",
    "Myanmar", "Nabataean", "Nag_Mundari", "Nandinagari", "New_Tai_Lue", "Newa", "Nko", "Nushu",
    "Nyiakeng_Puachue_Hmong", "Ogham", "Ol_Chiki", "Ol_Onal", "Old_Hungarian", "Old_Italic",
    "Old_North_Arabian", "Old_Permic", "Old_Persian", "Old_Sogdian", "Old_South_Arabian",
    "Old_Turkic", "Old_Uyghur", "Oriya", "Osage", "Osmanya", "Pahawh_Hmong", "Palmyrene",
    "Pau_Cin_Hau", "Phags_Pa", "Phoenician", "Psalter_Pahlavi", "Rejang", "Runic", "Samaritan",
    "Saurashtra", "Sharada", "Shavian", "Siddham", "SignWriting", "Sinhala", "Sogdian",
    "Sora_Sompeng", "Soyombo", "Sundanese", "Sunuwar", "Syloti_Nagri", "Syriac", "Tagalog",
    "Tagbanwa", "Tai_Le", "Tai_Tham", "Tai_Viet", "Takri", "Tamil", "Tangsa", "Tangut", "Telugu",
    "Thaana", "Thai", "Tibetan", "Tifinagh", "Tirhuta", "Todhri", "Toto", "Tulu_Tigalari", "Vai",
    "Vithkuqi", "Wancho", "Warang_Citi", "Yezidi", "Yi", "Zanabazar_Square",
];

/// Unicode versions in chronological order.
const VERSIONS: &[(u8, u8)] = &[
    (1, 1), (2, 0), (2, 1), (3, 0), (3, 1), (3, 2), (4, 0), (4, 1), (5, 0), (5, 1), (5, 2),
    (6, 0), (6, 1), (6, 2), (6, 3), (7, 0), (8, 0), (9, 0), (10, 0), (11, 0), (12, 0), (12, 1),
    (13, 0), (14, 0), (15, 0), (15, 1), (16, 0),
];

/// Binary properties as `(long name, short name)`.
const BINARY_PROPERTIES: &[(&str, &str)] = &[
    ("ASCII_Hex_Digit", "AHex"),
    ("Alphabetic", "Alpha"),
    ("Bidi_Control", "Bidi_C"),
    ("Bidi_Mirrored", "Bidi_M"),
    ("Case_Ignorable", "CI"),
    ("Cased", "Cased"),
    ("Changes_When_Casefolded", "CWCF"),
    ("Changes_When_Casemapped", "CWCM"),
    ("Changes_When_Lowercased", "CWL"),
    ("Changes_When_Titlecased", "CWT"),
    ("Changes_When_Uppercased", "CWU"),
    ("Dash", "Dash"),
    ("Default_Ignorable_Code_Point", "DI"),
    ("Deprecated", "Dep"),
    ("Diacritic", "Dia"),
    ("Emoji", "Emoji"),
    ("Emoji_Component", "EComp"),
    ("Emoji_Modifier", "EMod"),
    ("Emoji_Modifier_Base", "EBase"),
    ("Emoji_Presentation", "EPres"),
    ("Extended_Pictographic", "ExtPict"),
    ("Extender", "Ext"),
    ("Grapheme_Base", "Gr_Base"),
    ("Grapheme_Extend", "Gr_Ext"),
    ("Hex_Digit", "Hex"),
    ("IDS_Binary_Operator", "IDSB"),
    ("IDS_Trinary_Operator", "IDST"),
    ("ID_Continue", "IDC"),
    ("ID_Start", "IDS"),
    ("Ideographic", "Ideo"),
    ("Join_Control", "Join_C"),
    ("Logical_Order_Exception", "LOE"),
    ("Lowercase", "Lower"),
    ("Math", "Math"),
    ("Noncharacter_Code_Point", "NChar"),
    ("Pattern_Syntax", "Pat_Syn"),
    ("Pattern_White_Space", "Pat_WS"),
    ("Prepended_Concatenation_Mark", "PCM"),
    ("Quotation_Mark", "QMark"),
    ("Radical", "Radical"),
    ("Regional_Indicator", "RI"),
    ("Sentence_Terminal", "STerm"),
    ("Soft_Dotted", "SD"),
    ("Terminal_Punctuation", "Term"),
    ("Unified_Ideograph", "UIdeo"),
    ("Uppercase", "Upper"),
    ("Variation_Selector", "VS"),
    ("White_Space", "WSpace"),
    ("XID_Continue", "XIDC"),
    ("XID_Start", "XIDS"),
];

/// Parses `\p{query}` and returns the code point ranges of the resulting class.
pub(crate) fn class_ranges(query: &str) -> Option<Vec<CodePointRange>> {
    let hir = ParserBuilder::new()
        .build()
        .parse(&format!("\\p{{{}}}", query))
        .ok()?;
    let ranges = match hir.kind() {
        HirKind::Class(Class::Unicode(cls)) => cls
            .ranges()
            .iter()
            .map(|r| CodePointRange::new(r.start(), r.end()))
            .collect(),
        HirKind::Class(Class::Bytes(cls)) => cls
            .ranges()
            .iter()
            .map(|r| CodePointRange::new(r.start() as u32, r.end() as u32))
            .collect(),
        // Single code point classes are simplified to literals.
        HirKind::Literal(lit) => {
            let c = std::str::from_utf8(&lit.0).ok()?.chars().next()?;
            vec![CodePointRange::singleton(c)]
        }
        HirKind::Empty => vec![],
        _ => return None,
    };
    Some(ranges)
}

fn class_set(query: &str) -> Option<InversionList> {
    let set: Option<InversionList> = class_ranges(query).map(|ranges| ranges.into_iter().collect());
    if set.is_none() {
        trace!("no Unicode table for \\p{{{}}}", query);
    }
    set
}

/// Disjoint ranges mapped to a value, sorted by start.
#[derive(Debug, Default)]
struct Table {
    entries: Vec<(u32, u32, u16)>,
}

impl Table {
    fn insert(&mut self, set: &InversionList, value: u16) {
        self.entries
            .extend(set.ranges().map(|r| (r.start(), r.end(), value)));
    }

    fn finish(mut self) -> Self {
        self.entries.sort_unstable();
        self
    }

    fn get(&self, c: u32) -> Option<u16> {
        let i = self.entries.partition_point(|e| e.0 <= c);
        match i.checked_sub(1).map(|i| self.entries[i]) {
            Some((_, end, value)) if c <= end => Some(value),
            _ => None,
        }
    }

    fn start_points(&self) -> Vec<u32> {
        self.entries
            .iter()
            .flat_map(|&(start, end, _)| [start, end + 1])
            .collect()
    }
}

/// The built-in property resolver. Tables are derived from `regex-syntax` on
/// first use and kept for the lifetime of the resolver.
#[derive(Debug)]
pub struct UcdResolver {
    categories: OnceLock<Table>,
    scripts: OnceLock<Table>,
    ages: OnceLock<Table>,
    script_extensions: Vec<OnceLock<InversionList>>,
    binary: Vec<OnceLock<InversionList>>,
}

impl Default for UcdResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl UcdResolver {
    pub fn new() -> Self {
        UcdResolver {
            categories: OnceLock::new(),
            scripts: OnceLock::new(),
            ages: OnceLock::new(),
            script_extensions: SCRIPTS.iter().map(|_| OnceLock::new()).collect(),
            binary: BINARY_PROPERTIES.iter().map(|_| OnceLock::new()).collect(),
        }
    }

    /// The process-wide instance.
    pub fn shared() -> Arc<dyn PropertyResolver> {
        static SHARED: OnceLock<Arc<UcdResolver>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(UcdResolver::new())).clone()
    }

    fn categories(&self) -> &Table {
        self.categories.get_or_init(|| {
            let mut table = Table::default();
            for (gc, (short, _)) in CATEGORIES.iter().enumerate() {
                let gc = gc as u16;
                if gc == 0 || gc == CS {
                    continue;
                }
                if let Some(set) = class_set(short) {
                    table.insert(&set, gc);
                }
            }
            // Surrogates are not scalar values and thus missing from the tables.
            table.entries.push((0xD800, 0xDFFF, CS));
            let table = table.finish();
            debug!("built general category table: {} ranges", table.entries.len());
            table
        })
    }

    fn scripts(&self) -> &Table {
        self.scripts.get_or_init(|| {
            let mut table = Table::default();
            for (sc, name) in SCRIPTS.iter().enumerate().skip(1) {
                if let Some(set) = class_set(&format!("sc={}", name)) {
                    table.insert(&set, sc as u16);
                }
            }
            let table = table.finish();
            debug!("built script table: {} ranges", table.entries.len());
            table
        })
    }

    fn ages(&self) -> &Table {
        self.ages.get_or_init(|| {
            let mut table = Table::default();
            let mut seen = InversionList::new();
            for (i, &(major, minor)) in VERSIONS.iter().enumerate() {
                // Age classes are cumulative: all code points assigned up to the version.
                let cumulative = class_set(&format!("age=V{}_{}", major, minor))
                    .or_else(|| class_set(&format!("age={}.{}", major, minor)));
                let Some(mut cumulative) = cumulative else {
                    continue;
                };
                if (major, minor) == (2, 0) {
                    // Surrogates were assigned in 2.0.
                    let _ = cumulative.add_range(0xD800u32, 0xDFFFu32);
                }
                let new = cumulative.difference(&seen);
                table.insert(&new, i as u16);
                seen.combine_with(&new, crate::inversion::algebra::Op::Union);
            }
            let table = table.finish();
            debug!("built age table: {} ranges", table.entries.len());
            table
        })
    }

    fn script_extension_set(&self, script: usize) -> Option<&InversionList> {
        let cell = self.script_extensions.get(script)?;
        Some(cell.get_or_init(|| {
            class_set(&format!("scx={}", SCRIPTS[script])).unwrap_or_default()
        }))
    }

    fn binary_set(&self, index: usize) -> Option<&InversionList> {
        let cell = self.binary.get(index)?;
        Some(cell.get_or_init(|| class_set(BINARY_PROPERTIES[index].0).unwrap_or_default()))
    }

    fn category(&self, c: u32) -> u16 {
        self.categories().get(c).unwrap_or(0)
    }

    fn script(&self, c: u32) -> u16 {
        self.scripts().get(c).unwrap_or(0)
    }

    fn category_mask(&self, value: &str) -> Option<i32> {
        let value = normalize_name(value);
        CATEGORIES
            .iter()
            .enumerate()
            .find(|(_, (short, long))| normalize_name(short) == value || normalize_name(long) == value)
            .map(|(gc, _)| 1 << gc)
            .or_else(|| {
                CATEGORY_GROUPS
                    .iter()
                    .find(|(short, long, _)| {
                        normalize_name(short) == value || normalize_name(long) == value
                    })
                    .map(|&(_, _, mask)| mask)
            })
    }

    fn script_value(&self, value: &str) -> Option<i32> {
        let normalized = normalize_name(value);
        if let Some(sc) = SCRIPTS.iter().position(|s| normalize_name(s) == normalized) {
            return Some(sc as i32);
        }
        // Short names and other aliases: identify the script by one of its code points.
        let first = class_ranges(&format!("sc={}", value))?.first()?.start();
        Some(self.script(first) as i32)
    }
}

impl PropertyResolver for UcdResolver {
    fn property(&self, name: &str) -> Option<Property> {
        let (id, kind) = match normalize_name(name).as_str() {
            "gc" | "generalcategory" => (GC, PropertyKind::Mask),
            "sc" | "script" => (SC, PropertyKind::Enumerated),
            "scx" | "scriptextensions" => (SCX, PropertyKind::ScriptExtensions),
            "age" => (AGE, PropertyKind::Age),
            "nv" | "numericvalue" => (NV, PropertyKind::Numeric),
            "na" | "name" => (NA, PropertyKind::Name),
            other => {
                let i = BINARY_PROPERTIES.iter().position(|(long, short)| {
                    normalize_name(long) == other || normalize_name(short) == other
                })?;
                (BINARY + i as u32, PropertyKind::Binary)
            }
        };
        Some(Property::new(id, kind))
    }

    fn property_value(&self, property: Property, value: &str) -> Option<i32> {
        match property.kind {
            PropertyKind::Mask => self.category_mask(value),
            PropertyKind::Enumerated | PropertyKind::ScriptExtensions => self.script_value(value),
            PropertyKind::Binary => match normalize_name(value).as_str() {
                "y" | "yes" | "t" | "true" => Some(1),
                "n" | "no" | "f" | "false" => Some(0),
                _ => None,
            },
            _ => None,
        }
    }

    fn int_property(&self, c: u32, property: Property) -> i32 {
        match property.id {
            GC => 1 << self.category(c),
            SC => self.script(c) as i32,
            id if id >= BINARY => self
                .binary_set((id - BINARY) as usize)
                .is_some_and(|set| set.contains(c)) as i32,
            _ => 0,
        }
    }

    /// Decimal digits only: the value is the offset from the zero digit of the
    /// run of `Nd` code points containing `c`.
    fn numeric_value(&self, c: u32) -> f64 {
        let table = self.categories();
        let i = table.entries.partition_point(|e| e.0 <= c);
        match i.checked_sub(1).map(|i| table.entries[i]) {
            Some((start, end, ND)) if c <= end => ((c - start) % 10) as f64,
            _ => f64::NAN,
        }
    }

    fn age(&self, c: u32) -> Option<Version> {
        let (major, minor) = VERSIONS[self.ages().get(c)? as usize];
        Some(Version::new(major, minor))
    }

    fn has_script_extension(&self, c: u32, script: i32) -> bool {
        usize::try_from(script)
            .ok()
            .and_then(|sc| self.script_extension_set(sc))
            .is_some_and(|set| set.contains(c))
    }

    fn source(&self, property: Property) -> PropertySource {
        PropertySource(property.id)
    }

    fn start_points(&self, source: PropertySource) -> Vec<u32> {
        match source.0 {
            GC => self.categories().start_points(),
            SC => self.scripts().start_points(),
            AGE => self.ages().start_points(),
            SCX => (0..SCRIPTS.len())
                .filter_map(|sc| self.script_extension_set(sc))
                .flat_map(|set| set.boundaries().to_vec())
                .collect(),
            NV => {
                let table = self.categories();
                let mut points = table.start_points();
                for &(start, end, gc) in &table.entries {
                    if gc == ND {
                        points.extend(start..=end);
                    }
                }
                points
            }
            id if id >= BINARY => self
                .binary_set((id - BINARY) as usize)
                .map(|set| set.boundaries().to_vec())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Lookup;

    fn lookup() -> Lookup {
        Lookup::custom(Arc::new(UcdResolver::new()))
    }

    #[test]
    fn test_categories() {
        let r = UcdResolver::new();
        let gc = r.property("General_Category").unwrap();
        assert_eq!(r.int_property('A' as u32, gc), 1 << 1);
        assert_eq!(r.int_property('a' as u32, gc), 1 << 2);
        assert_eq!(r.int_property('5' as u32, gc), 1 << 9);
        assert_eq!(r.int_property(0xD800, gc), 1 << 18);
        assert_eq!(r.int_property(0x0378, gc), 1 << 0);
        assert_eq!(r.property_value(gc, "L"), Some(0b111110));
        assert_eq!(r.property_value(gc, "Lowercase Letter"), Some(1 << 2));
        assert_eq!(r.property_value(gc, "punct"), r.property_value(gc, "P"));
    }

    #[test]
    fn test_letter_set() {
        let l = lookup();
        let letters = l.alias_set("L", "").unwrap();
        assert!(letters.contains('a'));
        assert!(letters.contains('Ж'));
        assert!(!letters.contains('1'));
        assert_eq!(letters, l.alias_set("gc", "Letter").unwrap());
    }

    #[test]
    fn test_scripts() {
        let r = UcdResolver::new();
        let sc = r.property("Script").unwrap();
        let greek = r.property_value(sc, "Greek").unwrap();
        assert_eq!(r.property_value(sc, "Grek"), Some(greek));
        assert_eq!(r.int_property('α' as u32, sc), greek);
        let greek_set = lookup().alias_set("Greek", "").unwrap();
        assert!(greek_set.contains('Ω'));
        assert!(!greek_set.contains('a'));
    }

    #[test]
    fn test_binary() {
        let ws = lookup().alias_set("WSpace", "").unwrap();
        assert!(ws.contains(' '));
        assert!(ws.contains(0x3000u32));
        assert!(!ws.contains('x'));
        assert_eq!(ws, lookup().alias_set("White_Space", "true").unwrap());
    }

    #[test]
    fn test_numeric_value() {
        let r = UcdResolver::new();
        assert_eq!(r.numeric_value('7' as u32), 7.0);
        assert_eq!(r.numeric_value(0x0669), 9.0);
        assert!(r.numeric_value('x' as u32).is_nan());
        let nines = lookup().alias_set("nv", "9").unwrap();
        assert!(nines.contains('9'));
        assert!(nines.contains(0x0669u32));
        assert!(!nines.contains('8'));
    }

    #[test]
    fn test_age() {
        let r = UcdResolver::new();
        assert_eq!(r.age('a' as u32), Some(Version::new(1, 1)));
        assert_eq!(r.age(0x20AC), Some(Version::new(2, 1)));
        assert_eq!(r.age(0x0378), None);
        let old = lookup().alias_set("age", "2.0").unwrap();
        assert!(old.contains('a'));
        assert!(!old.contains(0x20ACu32));
    }

    #[test]
    fn test_script_extensions() {
        let r = UcdResolver::new();
        let scx = r.property("scx").unwrap();
        let arabic = r.property_value(scx, "Arab").unwrap();
        // ARABIC COMMA is Common but used by several scripts.
        assert!(r.has_script_extension(0x060C, arabic));
        assert!(lookup().alias_set("scx", "Arabic").unwrap().contains(0x060Cu32));
    }

    #[test]
    fn test_unknown_names() {
        let r = UcdResolver::new();
        assert!(r.property("NoSuchProperty").is_none());
        assert!(lookup().alias_set("na", "LATIN SMALL LETTER A").is_err());
        assert!(lookup().alias_set("gc", "Xx").is_err());
    }
}
