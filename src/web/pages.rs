//! HTML rendering for the form pages.

use crate::pipeline::SynthesisOutcome;
use crate::speech::{Language, VoiceStyle};

/// Static description of one form page.
pub struct FormPage<'a> {
    pub tagline: &'a str,
    pub languages: &'a [Language],
    pub styles: &'a [VoiceStyle],
    /// Offer a reference-clip upload (studio variant).
    pub reference_upload: bool,
    /// Names of stored reference clips to offer for reuse.
    pub stored_references: &'a [String],
}

/// What the result block of the page shows after a submission.
pub enum PageOutcome {
    Player {
        style: &'static str,
        download_name: String,
    },
    Error(String),
}

impl PageOutcome {
    /// Map a pipeline outcome onto the page.
    pub fn from_outcome(outcome: &SynthesisOutcome) -> PageOutcome {
        match outcome {
            SynthesisOutcome::Ready(artifact) => PageOutcome::Player {
                style: artifact.style.as_str(),
                download_name: artifact.download_name(),
            },
            SynthesisOutcome::Invalid(err) => PageOutcome::Error(err.to_string()),
            SynthesisOutcome::Failed { message } => PageOutcome::Error(message.clone()),
        }
    }
}

/// Escape text for inclusion in HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full form page, with the result block when a submission just
/// completed.
pub fn render(page: &FormPage<'_>, outcome: Option<&PageOutcome>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>VocalIA</title>\n<style>\n\
         body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }\n\
         textarea, select, input, button { display: block; margin: 0.5rem 0 1rem; }\n\
         textarea { width: 100%; }\n\
         .error { color: #b00020; }\n\
         .ok { color: #1b5e20; }\n\
         </style>\n</head>\n<body>\n<h1>VocalIA</h1>\n",
    );

    html.push_str(&format!("<p>{}</p>\n", escape(page.tagline)));

    match outcome {
        Some(PageOutcome::Player {
            style,
            download_name,
        }) => {
            html.push_str("<p class=\"ok\">Audio generated.</p>\n");
            html.push_str(&format!(
                "<audio controls src=\"/audio/{style}\"></audio>\n"
            ));
            html.push_str(&format!(
                "<p><a href=\"/download/{style}\">Download {}</a></p>\n",
                escape(download_name)
            ));
        }
        Some(PageOutcome::Error(message)) => {
            html.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
        }
        None => {}
    }

    let enctype = if page.reference_upload {
        " enctype=\"multipart/form-data\""
    } else {
        ""
    };
    html.push_str(&format!(
        "<form method=\"post\" action=\"/synthesize\"{enctype}>\n"
    ));

    html.push_str("<label for=\"text\">Text to convert</label>\n");
    html.push_str(
        "<textarea id=\"text\" name=\"text\" rows=\"6\" \
         placeholder=\"Enter your text here...\"></textarea>\n",
    );

    html.push_str("<label for=\"language\">Language</label>\n<select id=\"language\" name=\"language\">\n");
    for language in page.languages {
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            language.code(),
            language.label()
        ));
    }
    html.push_str("</select>\n");

    html.push_str("<label for=\"style\">Voice style</label>\n<select id=\"style\" name=\"style\">\n");
    for style in page.styles {
        html.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            style.as_str(),
            style.label()
        ));
    }
    html.push_str("</select>\n");

    if page.reference_upload {
        html.push_str("<label for=\"reference\">Reference voice clip (WAV, optional)</label>\n");
        html.push_str(
            "<input type=\"file\" id=\"reference\" name=\"reference\" accept=\"audio/wav\">\n",
        );
        html.push_str("<label for=\"clip_name\">Save clip as</label>\n");
        html.push_str(
            "<input type=\"text\" id=\"clip_name\" name=\"clip_name\" value=\"session\">\n",
        );

        if !page.stored_references.is_empty() {
            html.push_str(
                "<label for=\"stored_reference\">Or reuse a stored clip</label>\n\
                 <select id=\"stored_reference\" name=\"stored_reference\">\n\
                 <option value=\"\">(none)</option>\n",
            );
            for name in page.stored_references {
                let escaped = escape(name);
                html.push_str(&format!("<option value=\"{escaped}\">{escaped}</option>\n"));
            }
            html.push_str("</select>\n");
        }
    }

    html.push_str("<button type=\"submit\">Generate audio</button>\n</form>\n");

    if page.reference_upload && !page.stored_references.is_empty() {
        html.push_str("<h2>Stored reference clips</h2>\n<ul>\n");
        for name in page.stored_references {
            let escaped = escape(name);
            html.push_str(&format!(
                "<li>{escaped} <form method=\"post\" action=\"/references/{escaped}/delete\">\
                 <button type=\"submit\">Delete</button></form></li>\n"
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
