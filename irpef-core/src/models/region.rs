use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Region of residence.
///
/// The selector is carried through for display only: surcharge rates are
/// supplied explicitly, so the region never enters a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Abruzzo,
    Basilicata,
    Calabria,
    Campania,
    EmiliaRomagna,
    FriuliVeneziaGiulia,
    Lazio,
    Liguria,
    Lombardia,
    Marche,
    Molise,
    Piemonte,
    Puglia,
    Sardegna,
    Sicilia,
    Toscana,
    TrentinoAltoAdigeBolzano,
    TrentinoAltoAdigeTrento,
    Umbria,
    ValleDAosta,
    Veneto,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown region '{0}'")]
pub struct UnknownRegion(pub String);

impl Region {
    pub fn all() -> &'static [Region] {
        &[
            Region::Abruzzo,
            Region::Basilicata,
            Region::Calabria,
            Region::Campania,
            Region::EmiliaRomagna,
            Region::FriuliVeneziaGiulia,
            Region::Lazio,
            Region::Liguria,
            Region::Lombardia,
            Region::Marche,
            Region::Molise,
            Region::Piemonte,
            Region::Puglia,
            Region::Sardegna,
            Region::Sicilia,
            Region::Toscana,
            Region::TrentinoAltoAdigeBolzano,
            Region::TrentinoAltoAdigeTrento,
            Region::Umbria,
            Region::ValleDAosta,
            Region::Veneto,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Abruzzo => "Abruzzo",
            Region::Basilicata => "Basilicata",
            Region::Calabria => "Calabria",
            Region::Campania => "Campania",
            Region::EmiliaRomagna => "Emilia-Romagna",
            Region::FriuliVeneziaGiulia => "Friuli-Venezia Giulia",
            Region::Lazio => "Lazio",
            Region::Liguria => "Liguria",
            Region::Lombardia => "Lombardia",
            Region::Marche => "Marche",
            Region::Molise => "Molise",
            Region::Piemonte => "Piemonte",
            Region::Puglia => "Puglia",
            Region::Sardegna => "Sardegna",
            Region::Sicilia => "Sicilia",
            Region::Toscana => "Toscana",
            Region::TrentinoAltoAdigeBolzano => "Trentino-Alto Adige (Bolzano)",
            Region::TrentinoAltoAdigeTrento => "Trentino-Alto Adige (Trento)",
            Region::Umbria => "Umbria",
            Region::ValleDAosta => "Valle d'Aosta",
            Region::Veneto => "Veneto",
        }
    }

    /// Matches a display name ignoring case and any non-alphanumeric
    /// characters, so `emilia romagna` and `valle-d-aosta` both resolve.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = squash(s);
        if wanted.is_empty() {
            return None;
        }
        Self::all().iter().copied().find(|r| squash(r.name()) == wanted)
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

impl std::fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
