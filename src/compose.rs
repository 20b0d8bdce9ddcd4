//! Message templates for credential delivery and enrollment requests.
//!
//! CHANGELOG:
//! - 10/15/2026 - Missing-student notification
//! - 10/14/2026 - Initial implementation

use crate::roster::StudentRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Portal address closing every credentials message.
pub const PORTAL_URL: &str = "http://login.plurall.net";

/// Fixed credentials message for one student.
pub fn compose_credentials_message(student: &StudentRecord) -> String {
    format!(
        "*Acesso ao Portal Plurall*\n\
         \n\
         Olá *{name}*! :)\n\
         \n\
         Segue informação do seu acesso:\n\
         \n\
         *Usuário:* {login}\n\
         *Senha:* {password}\n\
         \n\
         *É importante acessar o aplicativo e completar o cadastro, preenchendo corretamente o número de telefone e o e-mail para garantir o pleno funcionamento da plataforma.*\n\
         \n\
         Bons estudos!\n\
         {url}",
        name = student.name,
        login = student.login,
        password = student.password,
        url = PORTAL_URL,
    )
}

fn bold_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\*(.*?)\*").ok())
        .as_ref()
}

/// Display rendering: line breaks to `<br>`, `*...*` to `<strong>...</strong>`.
///
/// Not an escaper. Markup already present in `text` passes through.
pub fn compose_display_markup(text: &str) -> String {
    let with_breaks = text.replace('\n', "<br>");
    match bold_pattern() {
        Some(pattern) => pattern
            .replace_all(&with_breaks, "<strong>$1</strong>")
            .into_owned(),
        None => with_breaks,
    }
}

/// Notification that a student is missing from a class roster.
///
/// With `student_phone`, asks for the credentials to be sent to that number.
pub fn compose_missing_student_message(
    class_name: &str,
    student_name: &str,
    student_phone: Option<&str>,
) -> String {
    let mut msg = format!(
        "O aluno *{}* não está cadastrado na turma *{}*.\n\n",
        student_name, class_name
    );

    match student_phone {
        Some(phone) => msg.push_str(&format!(
            "⚠ Peço, por gentileza, que realize a inclusão do aluno e envie o login e a senha para o aluno neste número: *{}* e me avise assim que for concluído.",
            phone
        )),
        None => msg.push_str(
            "⚠ Peço, por gentileza, que realize a inclusão do aluno na turma e me avise assim que for concluído.",
        ),
    }

    msg
}
