//! Prefilled messaging deep links.

/// Base of WhatsApp click-to-chat links.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Keep only the digits of a phone number (`+54 9 11-5555-0000` →
/// `5491155550000`). Returns `None` when nothing usable is left.
pub fn phone_digits(phone: Option<&str>) -> Option<String> {
    let digits: String = phone?.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// Build a click-to-chat link with `message` prefilled.
///
/// Without a usable phone number the link opens the contact picker instead.
///
/// ```
/// use progettare_core::messaging::whatsapp_link;
///
/// assert_eq!(
///     whatsapp_link(Some("+54 11 5555-0000"), "Hola & chau"),
///     "https://wa.me/541155550000?text=Hola%20%26%20chau"
/// );
/// assert_eq!(whatsapp_link(None, "Hola"), "https://wa.me/?text=Hola");
/// ```
pub fn whatsapp_link(phone: Option<&str>, message: &str) -> String {
    let number = phone_digits(phone).unwrap_or_default();
    format!(
        "{WHATSAPP_BASE_URL}{number}?text={}",
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_from_phone() {
        assert_eq!(phone_digits(Some("(011) 4555-1234")), Some("01145551234".into()));
        assert_eq!(phone_digits(Some("sin teléfono")), None);
        assert_eq!(phone_digits(None), None);
    }

    #[test]
    fn encodes_newlines_and_accents() {
        let link = whatsapp_link(Some("1234"), "Orden\nTela: Forrería");
        assert_eq!(
            link,
            "https://wa.me/1234?text=Orden%0ATela%3A%20Forrer%C3%ADa"
        );
    }
}
