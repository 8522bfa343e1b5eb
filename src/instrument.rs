// src/instrument.rs
use std::fmt;

/// The five public-bond instrument types published on ANBIMA's
/// secondary-market result pages. Each one maps to a URL segment, a sheet
/// name and a pair of header labels; all lookups are fixed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentType {
    Ltn,
    NtnC,
    Lft,
    NtnB,
    NtnF,
}

impl InstrumentType {
    /// Fixed processing order, matching the order the sheets appear in the
    /// final report.
    pub const ALL: [InstrumentType; 5] = [
        InstrumentType::Ltn,
        InstrumentType::NtnC,
        InstrumentType::Lft,
        InstrumentType::NtnB,
        InstrumentType::NtnF,
    ];

    /// URL segment used when building the result-page address.
    pub fn code(self) -> &'static str {
        match self {
            InstrumentType::Ltn => "ltn",
            InstrumentType::NtnC => "ntn-c",
            InstrumentType::Lft => "lft",
            InstrumentType::NtnB => "ntn-b",
            InstrumentType::NtnF => "ntn-f",
        }
    }

    /// Sheet name in the output workbook.
    pub fn sheet_name(self) -> &'static str {
        match self {
            InstrumentType::Ltn => "LTN",
            InstrumentType::NtnC => "NTN-C",
            InstrumentType::Lft => "LFT",
            InstrumentType::NtnB => "NTN-B",
            InstrumentType::NtnF => "NTN-F",
        }
    }

    /// Paper-kind label written to cell A3 of the sheet.
    pub fn paper_kind(self) -> &'static str {
        match self {
            InstrumentType::Ltn => "Papel PREFIXADO",
            InstrumentType::NtnC => "Papel IGP-M",
            InstrumentType::Lft => "Papel POS-SELIC",
            InstrumentType::NtnB => "Papel IPCA",
            InstrumentType::NtnF => "Papel PREFIXADO",
        }
    }

    /// Rate description written to cell C3 of the sheet.
    pub fn rate_label(self) -> &'static str {
        match self {
            InstrumentType::Ltn => "LTN - Taxa (% a.a.)/252",
            InstrumentType::NtnC => "NTN-C - Taxa (% a.a.)/252",
            InstrumentType::Lft => "LFT - Rentabilidade (% a.a.)/252",
            InstrumentType::NtnB => "NTN-B - Taxa (% a.a.)/252",
            InstrumentType::NtnF => "NTN-F - Taxa (% a.a.)/252",
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}
