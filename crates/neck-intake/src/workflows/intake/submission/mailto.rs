/// Build a `mailto:` link with a pre-filled subject and body.
pub fn compose_mailto(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        encode_component(subject),
        encode_component(body)
    )
}

/// Percent-encode everything outside the URI component unreserved set.
fn encode_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spaces_newlines_and_multibyte_text() {
        let link = compose_mailto(
            "info@fysiotherapienijmegen.nl",
            "Ernstig - Jan",
            "Score: 41/70\nbeïnvloedt & meer",
        );
        assert_eq!(
            link,
            "mailto:info@fysiotherapienijmegen.nl?subject=Ernstig%20-%20Jan&body=Score%3A%2041%2F70%0Abe%C3%AFnvloedt%20%26%20meer"
        );
    }
}
