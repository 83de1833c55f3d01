//! HTML pages for the form and the contact listing.

use crate::db::Contact;
use crate::validation::{EMAIL_KEY, NAME_KEY, PHONE_KEY};
use chrono::{DateTime, SecondsFormat};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:1rem}\
input{width:100%;padding:.4rem;box-sizing:border-box}\
button{margin-top:1rem;padding:.5rem 1rem}\
li{margin:.5rem 0}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"pt-BR\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         {body}\
         </body>\n\
         </html>\n",
        title = escape_html(title),
    )
}

/// Contact submission page.
pub fn render_form() -> String {
    let body = format!(
        "<h1>Cadastro de contato</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"{NAME_KEY}\">Nome</label>\n\
         <input id=\"{NAME_KEY}\" name=\"{NAME_KEY}\" type=\"text\" minlength=\"3\" required>\n\
         <label for=\"{EMAIL_KEY}\">E-mail</label>\n\
         <input id=\"{EMAIL_KEY}\" name=\"{EMAIL_KEY}\" type=\"email\" required>\n\
         <label for=\"{PHONE_KEY}\">Telefone</label>\n\
         <input id=\"{PHONE_KEY}\" name=\"{PHONE_KEY}\" type=\"tel\" placeholder=\"(11) 91234-5678\" required>\n\
         <button type=\"submit\">Enviar</button>\n\
         </form>\n\
         <p><a href=\"/contatos\">Ver contatos cadastrados</a></p>\n"
    );
    page("Cadastro de contato", &body)
}

/// Listing page for `contatos`.
pub fn render_contacts(contatos: &[Contact]) -> String {
    let mut body = String::from("<h1>Contatos cadastrados</h1>\n");

    if contatos.is_empty() {
        body.push_str("<p>Nenhum contato cadastrado.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for contato in contatos {
            // Writing to a String cannot fail.
            let _ = writeln!(
                body,
                "<li><strong>{}</strong> - {} - {}{}</li>",
                escape_html(&contato.name),
                escape_html(&contato.email),
                escape_html(&contato.phone),
                render_created_at(contato.created_at),
            );
        }
        body.push_str("</ul>\n");
    }

    body.push_str("<p><a href=\"/\">Cadastrar novo contato</a></p>\n");
    page("Contatos", &body)
}

/// Submission time as ` - <time>`, or nothing for an out-of-range timestamp.
fn render_created_at(created_at: i64) -> String {
    match DateTime::from_timestamp(created_at, 0) {
        Some(at) => format!(
            " - <time datetime=\"{}\">{}</time>",
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
            at.format("%d/%m/%Y %H:%M UTC"),
        ),
        None => String::new(),
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
