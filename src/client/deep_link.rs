//! Builds `wa.me` links that open WhatsApp with a message ready to send.

use reqwest::Url;

use crate::client::ClientError;

/// Build a link that opens a chat with `phone` and `message` prefilled.
///
/// Everything but the digits is stripped from `phone`, so `+34 600-000-000`
/// and `34600000000` give the same link.
///
/// ```
/// use ahorrapp::client::whatsapp_link;
///
/// let link = whatsapp_link("+51 999 888 777", "Gasto, comida, bembos, 22.90, 4-2-25").unwrap();
///
/// assert!(link.as_str().starts_with("https://wa.me/51999888777?text=Gasto"));
/// ```
///
/// # Errors
/// Returns [ClientError::InvalidPhoneNumber] if `phone` contains no digits.
pub fn whatsapp_link(phone: &str, message: &str) -> Result<Url, ClientError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return Err(ClientError::InvalidPhoneNumber(phone.to_owned()));
    }

    Url::parse_with_params(&format!("https://wa.me/{digits}"), [("text", message)])
        .map_err(|error| ClientError::InvalidUrl(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::whatsapp_link;
    use crate::client::ClientError;

    #[test]
    fn message_is_encoded_in_query() {
        let link = whatsapp_link("51999888777", "Ingreso, Oficina, Sueldo, 1500, 1/2/25").unwrap();

        assert_eq!(link.host_str(), Some("wa.me"));
        assert_eq!(link.path(), "/51999888777");
        let (key, value) = link.query_pairs().next().unwrap();
        assert_eq!(key, "text");
        assert_eq!(value, "Ingreso, Oficina, Sueldo, 1500, 1/2/25");
    }

    #[test]
    fn phone_without_digits_is_rejected() {
        let result = whatsapp_link("no phone", "hola");

        assert!(matches!(result, Err(ClientError::InvalidPhoneNumber(_))));
    }
}
