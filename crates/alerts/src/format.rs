//! Channel-specific alert text.

use teloxide::utils::html;
use witwhalert_core::{Alert, Headline};

/// Mathematical sans-serif bold digits, indexed by ASCII digit value.
const BOLD_DIGITS: [char; 10] = [
    '\u{1D7EC}', '\u{1D7ED}', '\u{1D7EE}', '\u{1D7EF}', '\u{1D7F0}',
    '\u{1D7F1}', '\u{1D7F2}', '\u{1D7F3}', '\u{1D7F4}', '\u{1D7F5}',
];

/// Replace every ASCII digit with its bold glyph. Anything else,
/// separators included, passes through unchanged.
pub fn bold_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => BOLD_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

/// Inverse of `bold_digits`.
pub fn unbold_digits(text: &str) -> String {
    text.chars()
        .map(|c| match BOLD_DIGITS.iter().position(|&b| b == c) {
            Some(d) => char::from(b'0' + d as u8),
            None => c,
        })
        .collect()
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// How a channel wants its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Plain text, bare explorer URL.
    Plain,
    /// Telegram-style HTML, explorer URL as a hyperlink.
    Html,
}

/// Renders alerts for channels.
#[derive(Debug, Clone)]
pub struct AlertFormatter {
    web_url: String,
    ticker: String,
}

impl AlertFormatter {
    pub fn new(web_url: &str) -> Self {
        Self {
            web_url: web_url.trim_end_matches('/').to_string(),
            ticker: "WITs".to_string(),
        }
    }

    /// Explorer page for a transaction.
    pub fn link(&self, txn_hash: &str) -> String {
        format!("{}/search/{}", self.web_url, txn_hash)
    }

    pub fn render(&self, alert: &Alert, format: MessageFormat) -> String {
        let amount = bold_digits(&group_thousands(alert.amount));
        let link = self.link(&alert.txn_hash);

        match format {
            MessageFormat::Plain => {
                let headline = match &alert.headline {
                    Headline::Tier(text) => text.clone(),
                    Headline::Transparency(msg) => msg.sentence(),
                };
                format!(
                    "{} 💰 {} {} changed hands! 💸 Want to see it ? 👀 -> {}",
                    headline, amount, self.ticker, link
                )
            }
            MessageFormat::Html => {
                let headline = match &alert.headline {
                    Headline::Tier(text) => html::escape(text),
                    Headline::Transparency(msg) => {
                        msg.map_labels(html::escape).sentence()
                    }
                };
                format!(
                    "{} 💰 <b>{}</b> {} changed hands! 💸 <a href=\"{}\">Want to see it ? 👀</a>",
                    headline,
                    amount,
                    self.ticker,
                    html::escape(&link)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use witwhalert_core::TransparencyMessage;

    fn tier_alert(amount: u64, text: &str) -> Alert {
        Alert {
            txn_hash: "abc123".to_string(),
            amount,
            headline: Headline::Tier(text.to_string()),
        }
    }

    #[test]
    fn test_bold_digits() {
        assert_eq!(bold_digits("0123456789"), "𝟬𝟭𝟮𝟯𝟰𝟱𝟲𝟳𝟴𝟵");
        assert_eq!(bold_digits("45,000"), "𝟰𝟱,𝟬𝟬𝟬");
    }

    #[test]
    fn test_bold_round_trip() {
        for amount in [0u64, 7, 45_000, 1_234_567, u64::MAX] {
            let plain = group_thousands(amount);
            let bold = bold_digits(&plain);
            assert!(!bold.chars().any(|c| c.is_ascii_digit()));
            assert_eq!(unbold_digits(&bold), plain);
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(45_000), "45,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_plain_has_bare_link() {
        let formatter = AlertFormatter::new("https://witnet.network/");
        let text = formatter.render(&tier_alert(45_000, "parrotfish"), MessageFormat::Plain);

        assert!(text.starts_with("parrotfish 💰 𝟰𝟱,𝟬𝟬𝟬 WITs"));
        assert!(text.ends_with("-> https://witnet.network/search/abc123"));
    }

    #[test]
    fn test_html_embeds_link_and_escapes() {
        let formatter = AlertFormatter::new("https://witnet.network");
        let text = formatter.render(&tier_alert(6_000, "fish <&> chips"), MessageFormat::Html);

        assert!(text.starts_with("fish &lt;&amp;&gt; chips"));
        assert!(text.contains("<b>𝟲,𝟬𝟬𝟬</b>"));
        assert!(text.contains("<a href=\"https://witnet.network/search/abc123\">"));
    }

    #[test]
    fn test_transparency_headline() {
        let formatter = AlertFormatter::new("https://witnet.network");
        let alert = Alert {
            txn_hash: "ff".to_string(),
            amount: 200_000,
            headline: Headline::Transparency(TransparencyMessage::Received {
                to: "Foundation <cold>".to_string(),
            }),
        };

        let plain = formatter.render(&alert, MessageFormat::Plain);
        assert!(plain.contains("\"Foundation <cold>\" received funds"));

        let html = formatter.render(&alert, MessageFormat::Html);
        assert!(html.contains("\"Foundation &lt;cold&gt;\" received funds"));
    }
}
