//! Species code table
//!
//! The short inventory layout keys its composition table by two-letter species
//! codes. The table below is exhaustive for the source domain; an unknown code
//! means a parser mismatch or an upstream schema change and is a hard error.

use crate::ParseError;

/// Two-letter species code → Estonian common name
const SPECIES_CODES: &[(&str, &str)] = &[
    // Trees
    ("MA", "mänd"),
    ("KU", "kuusk"),
    ("NU", "nulg"),
    ("LH", "lehis"),
    ("SD", "seedermänd"),
    ("TS", "ebatsuuga"),
    ("TA", "tamm"),
    ("SA", "saar"),
    ("VA", "vaher"),
    ("JA", "jalakas"),
    ("KP", "künnapuu"),
    ("KS", "kask"),
    ("HB", "haab"),
    ("LM", "sanglepp"),
    ("LV", "hall lepp"),
    ("PN", "pärn"),
    ("PP", "pappel"),
    ("RE", "remmelgas"),
    ("TM", "toomingas"),
    ("PI", "pihlakas"),
    ("TO", "teised okaspuuliigid"),
    ("TL", "teised lehtpuuliigid"),
    // Bushes
    ("PA", "paju"),
    ("SP", "sarapuu"),
    ("PK", "paakspuu"),
    ("TY", "türnpuu"),
    ("KL", "kuslapuu"),
    ("KD", "kadakas"),
    ("TP", "teised põõsaliigid"),
];

/// Resolves a two-letter species code to its Estonian name.
///
/// Returns [`ParseError::SchemaMismatch`] for unrecognized codes; they must
/// not be silently ignored.
pub fn species_name(code: &str) -> Result<&'static str, ParseError> {
    SPECIES_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .ok_or_else(|| ParseError::schema(format!("unknown species code {code:?}")))
}
