//! The normalized material record.

use serde::{Deserialize, Serialize};

/// Material name used when no material column can be resolved.
pub const UNKNOWN_MATERIAL: &str = "Unknown";

/// One spreadsheet row mapped onto the fixed optical-property schema.
///
/// Numeric fields are always finite or `None` (serialized as `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material: String,
    pub wavelength: Option<f64>,
    pub n: Option<f64>,
    pub k: Option<f64>,
    /// Real part of the permittivity
    #[serde(rename = "Re_e")]
    pub re_e: Option<f64>,
    /// Imaginary part of the permittivity
    #[serde(rename = "Im_e")]
    pub im_e: Option<f64>,
    #[serde(rename = "Q")]
    pub q: Option<f64>,
    #[serde(rename = "PL")]
    pub pl: Option<f64>,
    #[serde(rename = "Con")]
    pub con: Option<f64>,
    #[serde(rename = "Q_PL")]
    pub q_pl: Option<f64>,
    #[serde(rename = "Q_con")]
    pub q_con: Option<f64>,
}

impl MaterialRecord {
    /// A record for the given material with every numeric field empty.
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            wavelength: None,
            n: None,
            k: None,
            re_e: None,
            im_e: None,
            q: None,
            pl: None,
            con: None,
            q_pl: None,
            q_con: None,
        }
    }

    /// Mutable access to a numeric field.
    pub fn number_mut(&mut self, field: NumericField) -> &mut Option<f64> {
        match field {
            NumericField::Wavelength => &mut self.wavelength,
            NumericField::N => &mut self.n,
            NumericField::K => &mut self.k,
            NumericField::ReE => &mut self.re_e,
            NumericField::ImE => &mut self.im_e,
            NumericField::Q => &mut self.q,
            NumericField::Pl => &mut self.pl,
            NumericField::Con => &mut self.con,
            NumericField::QPl => &mut self.q_pl,
            NumericField::QCon => &mut self.q_con,
        }
    }

    /// Read a numeric field.
    pub fn number(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Wavelength => self.wavelength,
            NumericField::N => self.n,
            NumericField::K => self.k,
            NumericField::ReE => self.re_e,
            NumericField::ImE => self.im_e,
            NumericField::Q => self.q,
            NumericField::Pl => self.pl,
            NumericField::Con => self.con,
            NumericField::QPl => self.q_pl,
            NumericField::QCon => self.q_con,
        }
    }
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self::new(UNKNOWN_MATERIAL)
    }
}

/// The numeric columns of a [`MaterialRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Wavelength,
    N,
    K,
    ReE,
    ImE,
    Q,
    Pl,
    Con,
    QPl,
    QCon,
}

impl NumericField {
    /// All numeric fields in output order.
    pub const ALL: [NumericField; 10] = [
        NumericField::Wavelength,
        NumericField::N,
        NumericField::K,
        NumericField::ReE,
        NumericField::ImE,
        NumericField::Q,
        NumericField::Pl,
        NumericField::Con,
        NumericField::QPl,
        NumericField::QCon,
    ];

    /// JSON field name.
    pub fn name(&self) -> &'static str {
        match self {
            NumericField::Wavelength => "wavelength",
            NumericField::N => "n",
            NumericField::K => "k",
            NumericField::ReE => "Re_e",
            NumericField::ImE => "Im_e",
            NumericField::Q => "Q",
            NumericField::Pl => "PL",
            NumericField::Con => "Con",
            NumericField::QPl => "Q_PL",
            NumericField::QCon => "Q_con",
        }
    }
}
