/*! Script detection and phonetic codes for cross-script name matching.

Classifies characters by the Indic (or Latin) alphabet they belong to,
reduces names to soundex codes that are comparable across Indic scripts,
and transliterates Latin-script names written in [`ITRANS`] into
Devanagari so that a mixed table of names can be encoded in one script.

The Indic alphabets share a positional layout: the letter at index `i` of
the Devanagari alphabet sounds like the letter at index `i` of the Tamil or
Bengali one, which is what makes the soundex table work across scripts.

[`ITRANS`]: (https://www.aczoom.com/itrans/)

# Usage examples

```
use lipi::charmap::{self, Language};
use lipi::soundex;

assert_eq!(charmap::language('अ'), Some(Language::Hindi));
assert_eq!(soundex::soundex("रमेश").as_str(), "रNDS0000");
```

The `lipi-bin` crate in the same repository wraps the pipeline in a
command line tool.
*/

pub mod case_handling;
pub mod charmap;
pub mod pipeline;
pub mod soundex;
pub mod transliterate;
