// File: src/services/replies.rs
//
// User-facing texts (Spanish, WhatsApp markdown).

use clinibot_common::models::{Appointment, Slot};

pub const MAX_APPOINTMENTS_LISTED: usize = 5;
pub const MAX_SLOTS_LISTED: usize = 6;

pub const CONSENT_GRANTED: &str =
    "Gracias. Consentimiento registrado ✅. Escribe *MENU* para continuar.";

pub const RUT_INVALID: &str = "El RUT no parece válido. Ejemplo: 12.345.678-5";
pub const PHONE_IDENTIFIED: &str =
    "Te identificaré por tu número de WhatsApp ✅. ¿Deseas *MIS HORAS* o *AGENDAR*?";

pub const NO_APPOINTMENTS: &str = "No encontré horas agendadas. ¿Deseas *AGENDAR*?";
pub const APPOINTMENTS_HEADER: &str = "Tus próximas horas:";
pub const APPOINTMENTS_FAILED: &str =
    "Hubo un problema al consultar tus horas. Intenta más tarde.";

pub const NO_AVAILABILITY: &str =
    "No vi disponibilidad con esos filtros. Prueba otra fecha/especialidad.";
pub const AVAILABILITY_FAILED: &str = "No pude obtener disponibilidad ahora mismo.";

pub const BOOK_USAGE: &str = "Formato: RESERVAR YYYY-MM-DD HH:MM";
pub const BOOK_REJECTED: &str = "No fue posible reservar ese horario. Intenta otro.";
pub const BOOK_FAILED: &str = "No pude completar la reserva en este momento.";

pub const CANCEL_PROMPT: &str =
    "Indica el código de la reserva a cancelar (ej.: CANCELAR ABC123).";
pub const CANCELLED: &str = "Reserva cancelada ✅";
pub const CANCEL_REJECTED: &str = "No pude cancelar esa reserva.";
pub const CANCEL_FAILED: &str = "No pude cancelar ahora mismo.";

pub const HELP: &str = "Comandos:\n\
- MENU\n\
- MIS HORAS\n\
- AGENDAR <Especialidad> <YYYY-MM-DD>\n\
- RESERVAR <YYYY-MM-DD> <HH:MM>\n\
- CANCELAR <codigo>\n";

pub const FALLBACK: &str = "No entendí 🤔. Escribe *MENU* para ver opciones.";

pub fn consent_request(clinic_name: &str) -> String {
    format!(
        "Hola 👋 Soy el asistente virtual de {}.\n\
         Para continuar, necesito tu consentimiento para usar tus datos solo con fines de agendamiento y recordatorios.\n\
         Responde *ACEPTO* para continuar.",
        clinic_name
    )
}

pub fn menu(clinic_name: &str) -> String {
    format!(
        "Hola 👋 Soy el asistente virtual de *{}*.\n\
         ¿Cómo te identificas?\n1) Con mi RUT\n2) Con mi número de WhatsApp\n\n\
         Comandos: MIS HORAS • AGENDAR • RESERVAR • CANCELAR • AYUDA",
        clinic_name
    )
}

pub fn rut_verified(masked: &str) -> String {
    format!("RUT verificado ✅ ({}). ¿Qué deseas? *MIS HORAS* o *AGENDAR*.", masked)
}

pub fn appointments(list: &[Appointment]) -> String {
    let mut lines = vec![APPOINTMENTS_HEADER.to_string()];
    lines.extend(list.iter().take(MAX_APPOINTMENTS_LISTED).map(|a| {
        format!("- {} {} · {} · {}", a.date, a.time, a.specialty, a.professional)
    }));
    lines.join("\n")
}

pub fn availability(slots: &[Slot]) -> String {
    let joined = slots
        .iter()
        .take(MAX_SLOTS_LISTED)
        .map(|s| format!("- {} {} · {} ({})", s.date, s.time, s.professional, s.specialty))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Estas son algunas disponibilidades:\n{}\n\nResponde: *RESERVAR YYYY-MM-DD HH:MM*",
        joined
    )
}

pub fn booked(date: &str, time: &str) -> String {
    format!("Listo ✅. Hora reservada para {} {}.", date, time)
}
