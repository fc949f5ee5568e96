//! User-visible strings
//!
//! Every text shown on screen or handed to the biometric prompt comes from a
//! [`Strings`] table selected by [`Locale`].

use serde::{Deserialize, Serialize};

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    English,
    Spanish,
}

impl Locale {
    /// Get the string table for this locale
    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::English => &ENGLISH,
            Locale::Spanish => &SPANISH,
        }
    }
}

/// Localized text table
#[derive(Debug)]
pub struct Strings {
    pub window_title: &'static str,
    pub menu_title: &'static str,
    pub camera_button: &'static str,
    pub gallery_button: &'static str,
    pub back_button: &'static str,
    pub copy_button: &'static str,
    pub no_text_found: &'static str,
    pub bypass_button: &'static str,
    pub no_sensor_message: &'static str,
    pub face_unsupported_message: &'static str,
    pub retry_button: &'static str,
    pub waiting_for_sensor: &'static str,
    pub alert_title: &'static str,
    pub alert_message: &'static str,
    pub alert_dismiss: &'static str,
    pub prompt_message: &'static str,
    pub prompt_title: &'static str,
    pub sensor_description: &'static str,
    pub sensor_error_description: &'static str,
    pub cancel_text: &'static str,
}

static ENGLISH: Strings = Strings {
    window_title: "ScanPass",
    menu_title: "Text Recognition from Images",
    camera_button: "From Camera",
    gallery_button: "From Gallery",
    back_button: "Back",
    copy_button: "Copy text",
    no_text_found: "No text recognized",
    bypass_button: "Enter anyway",
    no_sensor_message: "Looks like this device has no fingerprint reader.",
    face_unsupported_message: "Face authentication is not supported yet. Fingerprint authentication is required.",
    retry_button: "Try again",
    waiting_for_sensor: "Waiting for the fingerprint sensor...",
    alert_title: "Incorrect Authentication",
    alert_message: "Please try again",
    alert_dismiss: "OK",
    prompt_message: "Please use your fingerprint to authenticate.",
    prompt_title: "Authentication required",
    sensor_description: "Fingerprint sensor",
    sensor_error_description: "Incorrect authentication",
    cancel_text: "Cancel",
};

static SPANISH: Strings = Strings {
    window_title: "ScanPass",
    menu_title: "Reconocimiento de Texto en Imágenes",
    camera_button: "Desde Cámara",
    gallery_button: "Desde Galería",
    back_button: "Regresar",
    copy_button: "Copiar texto",
    no_text_found: "No se reconoció texto",
    bypass_button: "Entrar de todas formas",
    no_sensor_message: "Parece que tu equipo no tiene lector de huellas digitales.",
    face_unsupported_message: "La autenticación facial aún no está soportada. Se requiere huella digital.",
    retry_button: "Volver a intentar",
    waiting_for_sensor: "Esperando el lector de huellas...",
    alert_title: "Autenticación Incorrecta",
    alert_message: "Por favor vuelve a intentarlo",
    alert_dismiss: "Aceptar",
    prompt_message: "Por favor use su huella para autenticar.",
    prompt_title: "Autenticación requerida",
    sensor_description: "Sensor de huella",
    sensor_error_description: "Autenticación Incorrecta",
    cancel_text: "Cancelar",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_english() {
        assert_eq!(Locale::default(), Locale::English);
        assert_eq!(Locale::default().strings().alert_title, "Incorrect Authentication");
    }

    #[test]
    fn test_spanish_strings() {
        let strings = Locale::Spanish.strings();
        assert_eq!(strings.back_button, "Regresar");
        assert_eq!(strings.bypass_button, "Entrar de todas formas");
    }
}
