//! Catalog of playable legends and their provider IDs.

use std::fmt;
use std::str::FromStr;

use crate::errors::BrawlhallaError;

macro_rules! legends {
    ($($variant:ident => ($id:literal, $key:literal)),+ $(,)?) => {
        /// A legend with a known provider ID.
        ///
        /// Legends released after this catalog was written are still reachable
        /// through [`LegendRef::Raw`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Legend {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl Legend {
            /// Every catalogued legend, in ID order.
            pub const ALL: &'static [Legend] = &[$(Legend::$variant),+];

            /// Returns every catalogued legend, in ID order.
            pub fn all() -> &'static [Legend] {
                Self::ALL
            }

            /// Returns the provider ID.
            pub fn id(self) -> u32 {
                match self {
                    $(Legend::$variant => $id,)+
                }
            }

            /// Returns the provider's name key, e.g. `"bodvar"`.
            pub fn key(self) -> &'static str {
                match self {
                    $(Legend::$variant => $key,)+
                }
            }

            /// Looks up a legend by provider ID.
            pub fn from_id(id: u32) -> Option<Legend> {
                match id {
                    $($id => Some(Legend::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

legends! {
    Bodvar => (3, "bodvar"),
    Cassidy => (4, "cassidy"),
    Orion => (5, "orion"),
    LordVraxx => (6, "lordvraxx"),
    Gnash => (7, "gnash"),
    QueenNai => (8, "queennai"),
    Lucien => (9, "lucien"),
    Hattori => (10, "hattori"),
    SirRoland => (11, "sirroland"),
    Scarlet => (12, "scarlet"),
    Thatch => (13, "thatch"),
    Ada => (14, "ada"),
    Sentinel => (15, "sentinel"),
    Teros => (16, "teros"),
    Ember => (18, "ember"),
    Brynn => (19, "brynn"),
    Asuri => (20, "asuri"),
    Barraza => (21, "barraza"),
    Ulgrim => (22, "ulgrim"),
    Azoth => (23, "azoth"),
    Koji => (24, "koji"),
    Diana => (25, "diana"),
    Jhala => (26, "jhala"),
    Kor => (28, "kor"),
    WuShang => (29, "wushang"),
    Val => (30, "val"),
    Ragnir => (31, "ragnir"),
    Cross => (32, "cross"),
    Mirage => (33, "mirage"),
    Nix => (34, "nix"),
    Mordex => (35, "mordex"),
    Yumiko => (36, "yumiko"),
    Artemis => (37, "artemis"),
    Caspian => (38, "caspian"),
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Legend {
    type Err = BrawlhallaError;

    /// Accepts the name key in any case, ignoring separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        Legend::ALL
            .iter()
            .copied()
            .find(|legend| legend.key() == wanted)
            .ok_or_else(|| BrawlhallaError::configuration(format!("Unknown legend '{}'", s)))
    }
}

/// A legend addressed either symbolically or by raw provider ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegendRef {
    /// A catalogued legend.
    Symbolic(Legend),
    /// Any provider ID, catalogued or not.
    Raw(u32),
}

impl LegendRef {
    /// Returns the provider ID.
    pub fn id(self) -> u32 {
        match self {
            LegendRef::Symbolic(legend) => legend.id(),
            LegendRef::Raw(id) => id,
        }
    }
}

impl From<Legend> for LegendRef {
    fn from(legend: Legend) -> Self {
        LegendRef::Symbolic(legend)
    }
}

impl From<u32> for LegendRef {
    fn from(id: u32) -> Self {
        LegendRef::Raw(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_catalog() {
        assert_eq!(Legend::all().len(), 34);
        for legend in Legend::all() {
            assert_eq!(Legend::from_id(legend.id()), Some(*legend));
        }
    }

    #[test]
    fn test_gaps_in_catalog() {
        assert_eq!(Legend::from_id(17), None);
        assert_eq!(Legend::from_id(27), None);
        assert_eq!(Legend::Caspian.id(), 38);
    }

    #[test]
    fn test_from_str_is_forgiving() {
        assert_eq!("Lord Vraxx".parse::<Legend>().unwrap(), Legend::LordVraxx);
        assert_eq!("wu_shang".parse::<Legend>().unwrap(), Legend::WuShang);
        assert!("nobody".parse::<Legend>().is_err());
    }

    #[test]
    fn test_legend_ref_conversions() {
        assert_eq!(LegendRef::from(Legend::Azoth).id(), 23);
        assert_eq!(LegendRef::from(9001).id(), 9001);
    }
}
