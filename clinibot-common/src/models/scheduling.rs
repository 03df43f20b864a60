use serde::{Deserialize, Serialize};

/// An upcoming appointment for a patient, as shown in `MIS HORAS`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub date: String,
    pub time: String,
    pub specialty: String,
    pub professional: String,
    /// Booking code usable with `CANCELAR <code>`.
    pub code: Option<String>,
}

/// A free slot offered by the scheduling system.
///
/// The availability endpoint is not consistent about field language, so
/// both English and Spanish keys are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, alias = "fecha")]
    pub date: String,
    #[serde(default, alias = "hora")]
    pub time: String,
    #[serde(default, alias = "profesional")]
    pub professional: String,
    #[serde(default, alias = "especialidad")]
    pub specialty: String,
}
