//! HTML pages for the web interface.
//!
//! Plain `format!` templates; every user-supplied value goes through
//! `html_escape`.

use crate::session::{FlashMessage, SessionAccount};
use siteapp_core::{Person, PersonForm, PersonId, RegisterRequest};

const COMMON_STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 1000px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
    }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    h1 {
        color: #333;
        border-bottom: 2px solid #0066cc;
        padding-bottom: 10px;
    }
    .form-group {
        margin: 15px 0;
    }
    .form-row {
        display: flex;
        gap: 15px;
    }
    .form-row .form-group {
        flex: 1;
    }
    label {
        display: block;
        font-weight: bold;
        margin-bottom: 5px;
        color: #333;
    }
    input[type="text"],
    input[type="email"],
    input[type="password"],
    input[type="number"] {
        width: 100%;
        padding: 10px;
        border: 1px solid #ddd;
        border-radius: 4px;
        font-size: 14px;
        box-sizing: border-box;
    }
    button, .button {
        background: #0066cc;
        color: white;
        padding: 10px 20px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
        font-size: 14px;
        font-weight: bold;
        text-decoration: none;
        display: inline-block;
    }
    .secondary {
        background: #999;
    }
    .danger {
        background: #d9534f;
    }
    .inline {
        display: inline;
    }
    .toolbar {
        display: flex;
        justify-content: space-between;
        align-items: center;
    }
    table {
        width: 100%;
        border-collapse: collapse;
        margin: 20px 0;
    }
    th, td {
        text-align: left;
        padding: 10px;
        border-bottom: 1px solid #ddd;
    }
    th {
        background: #f0f0f0;
    }
    .error {
        color: #a94442;
        background: #f2dede;
        padding: 10px;
        border-radius: 4px;
        margin: 10px 0;
    }
    .success {
        color: #3c763d;
        background: #dff0d8;
        padding: 10px;
        border-radius: 4px;
        margin: 10px 0;
    }
    .muted {
        color: #666;
        font-style: italic;
    }
"#;

/// Whether the record form creates a new record or edits `PersonId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PersonId),
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="utf-8">
    <title>{}</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        html_escape(title)
    )
}

fn messages_html(flashes: &[FlashMessage], error: Option<&str>) -> String {
    let mut html: String = flashes
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="success">{}</div>"#,
                html_escape(&flash.text)
            )
        })
        .collect();
    if let Some(error) = error {
        html.push_str(&format!(r#"<div class="error">{}</div>"#, html_escape(error)));
    }
    html
}

fn text_input(id: &str, label: &str, kind: &str, value: &str, extra: &str) -> String {
    format!(
        r#"<div class="form-group">
            <label for="{id}">{label}</label>
            <input type="{kind}" id="{id}" name="{id}" value="{}" {extra}>
        </div>"#,
        html_escape(value)
    )
}

/// Login page; `identifier` refills the username/email field.
pub fn login_page(error: Option<&str>, identifier: &str) -> String {
    let body = format!(
        r#"        <h1>Entrar</h1>
        {}
        <form method="POST" action="/">
            {}
            {}
            <button type="submit">Entrar</button>
        </form>
        <p>Não tem conta? <a href="/registrar/">Cadastre-se</a></p>"#,
        messages_html(&[], error),
        text_input(
            "username",
            "Usuário ou e-mail",
            "text",
            identifier,
            "required autofocus"
        ),
        text_input("password", "Senha", "password", "", "required"),
    );
    page("Entrar", &body)
}

/// Registration page; passwords are never echoed back.
pub fn register_page(error: Option<&str>, request: &RegisterRequest) -> String {
    let body = format!(
        r#"        <h1>Criar conta</h1>
        {}
        <form method="POST" action="/registrar/">
            {}
            <small class="muted">Opcional; gerado a partir do e-mail quando vazio.</small>
            {}
            {}
            {}
            <button type="submit">Cadastrar</button>
        </form>
        <p>Já tem conta? <a href="/">Entrar</a></p>"#,
        messages_html(&[], error),
        text_input("username", "Usuário", "text", &request.username, "autofocus"),
        text_input("email", "E-mail", "email", &request.email, ""),
        text_input("password1", "Senha", "password", "", "required"),
        text_input("password2", "Confirmar senha", "password", "", "required"),
    );
    page("Criar conta", &body)
}

fn optional(value: &Option<String>) -> String {
    value.as_deref().map(html_escape).unwrap_or_default()
}

/// Record list, ordered as given.
pub fn people_list_page(
    account: &SessionAccount,
    people: &[Person],
    flashes: &[FlashMessage],
) -> String {
    let table = if people.is_empty() {
        r#"<p class="muted">Nenhum usuário cadastrado.</p>"#.to_string()
    } else {
        let rows: String = people
            .iter()
            .map(|person| {
                format!(
                    r#"<tr>
                <td>{id}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>
                    <a href="/usuarios/{id}/editar/">Editar</a>
                    <a href="/usuarios/{id}/excluir/">Excluir</a>
                </td>
            </tr>"#,
                    html_escape(&person.name),
                    person.age.map(|age| age.to_string()).unwrap_or_default(),
                    optional(&person.email),
                    optional(&person.phone),
                    optional(&person.city),
                    optional(&person.region),
                    id = person.id,
                )
            })
            .collect();
        format!(
            r#"<table>
            <tr>
                <th>ID</th>
                <th>Nome</th>
                <th>Idade</th>
                <th>E-mail</th>
                <th>Telefone</th>
                <th>Cidade</th>
                <th>UF</th>
                <th>Ações</th>
            </tr>
            {rows}
        </table>"#
        )
    };

    let body = format!(
        r#"        <div class="toolbar">
            <h1>Usuários</h1>
            <div>
                <span>{}</span>
                <form method="POST" action="/logout/" class="inline">
                    <button type="submit" class="secondary">Sair</button>
                </form>
            </div>
        </div>
        {}
        <a class="button" href="/usuarios/novo/">Novo usuário</a>
        {table}"#,
        html_escape(&account.username),
        messages_html(flashes, None),
    );
    page("Usuários", &body)
}

/// Create/edit form, refilled with `form` values.
pub fn person_form_page(
    mode: FormMode,
    form: &PersonForm,
    error: Option<&str>,
    flashes: &[FlashMessage],
) -> String {
    let (title, action) = match mode {
        FormMode::Create => ("Novo usuário".to_string(), "/usuarios/novo/".to_string()),
        FormMode::Edit(id) => (
            format!("Editar usuário #{id}"),
            format!("/usuarios/{id}/editar/"),
        ),
    };

    let body = format!(
        r#"        <h1>{}</h1>
        {}
        <form method="POST" action="{action}">
            {}
            <div class="form-row">
                {}
                {}
                {}
            </div>
            <div class="form-row">
                {}
                {}
            </div>
            <div class="form-row">
                {}
                {}
                {}
            </div>
            <button type="submit">Salvar</button>
            <a class="button secondary" href="/usuarios/">Cancelar</a>
        </form>"#,
        html_escape(&title),
        messages_html(flashes, error),
        text_input("nome", "Nome", "text", &form.name, "required maxlength=\"120\""),
        text_input("idade", "Idade", "text", &form.age, "inputmode=\"numeric\""),
        text_input("email", "E-mail", "text", &form.email, ""),
        text_input("telefone", "Telefone", "text", &form.phone, "maxlength=\"20\""),
        text_input("cep", "CEP", "text", &form.postal_code, "maxlength=\"9\" placeholder=\"00000-000\""),
        text_input("logradouro", "Logradouro", "text", &form.street, "maxlength=\"255\""),
        text_input("bairro", "Bairro", "text", &form.neighborhood, "maxlength=\"120\""),
        text_input("cidade", "Cidade", "text", &form.city, "maxlength=\"120\""),
        text_input("uf", "UF", "text", &form.region, "maxlength=\"2\""),
    );
    page(&title, &body)
}

/// Second step of deletion; only the POST removes the record.
pub fn confirm_delete_page(person: &Person) -> String {
    let body = format!(
        r#"        <h1>Excluir usuário</h1>
        <p>Tem certeza que deseja excluir <strong>{}</strong>?</p>
        <form method="POST" action="/usuarios/{}/excluir/">
            <button type="submit" class="danger">Confirmar exclusão</button>
            <a class="button secondary" href="/usuarios/">Cancelar</a>
        </form>"#,
        html_escape(&person.to_string()),
        person.id,
    );
    page("Excluir usuário", &body)
}

pub fn not_found_page() -> String {
    page(
        "Não encontrado",
        r#"        <h1>Página não encontrada</h1>
        <p><a href="/usuarios/">Voltar</a></p>"#,
    )
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"        <h1>Erro</h1>
        <div class="error">{}</div>
        <p><a href="/usuarios/">Voltar</a></p>"#,
        html_escape(message)
    );
    page("Erro", &body)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::{html_escape, person_form_page, FormMode};
    use siteapp_core::PersonForm;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#x27;Neil &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn form_keeps_submitted_values_escaped() {
        let form = PersonForm {
            name: "<b>Maria</b>".to_string(),
            age: "trinta".to_string(),
            ..PersonForm::default()
        };
        let html = person_form_page(FormMode::Edit(4), &form, Some("Idade inválida."), &[]);

        assert!(html.contains("/usuarios/4/editar/"));
        assert!(html.contains("value=\"trinta\""));
        assert!(html.contains("&lt;b&gt;Maria&lt;/b&gt;"));
        assert!(html.contains("Idade inválida."));
    }
}
