// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_LANG: &str = "en";

// Catálogo embutido: (chave, inglês, português).
// `{0}` é substituído pelo argumento da mensagem.
const CATALOG: &[(&str, &str, &str)] = &[
    ("validation_failed", "One or more fields are invalid.", "Um ou mais campos são inválidos."),
    ("email_already_exists", "This e-mail is already in use.", "Este e-mail já está em uso."),
    ("invalid_credentials", "Invalid e-mail or password.", "E-mail ou senha inválidos."),
    ("invalid_token", "Authentication token is invalid or missing.", "Token de autenticação inválido ou ausente."),
    ("forbidden", "You do not have access to this resource.", "Você não tem acesso a este recurso."),
    ("user_not_found", "User not found.", "Usuário não encontrado."),
    ("resource_not_found", "{0} not found.", "{0} não encontrado."),
    ("property_not_pending", "Only pending listings can be reviewed (current status: {0}).", "Apenas anúncios pendentes podem ser moderados (status atual: {0})."),
    ("invalid_agent", "User {0} is not an agent.", "O usuário {0} não é um corretor."),
    ("coupon_code_conflict", "Could not generate a unique coupon code, try again.", "Não foi possível gerar um código de cupom único, tente novamente."),
    ("invalid_reset_token", "Password reset link is invalid or has expired.", "O link de redefinição de senha é inválido ou expirou."),
    ("admin_registration_disabled", "Admin registration is disabled.", "O registro de administradores está desativado."),
    ("invalid_admin_key", "Invalid admin registration key.", "Chave de registro de administrador inválida."),
    ("cannot_delete_self", "You cannot delete your own account.", "Você não pode excluir a própria conta."),
    ("bad_request", "{0}", "{0}"),
    ("invalid_body", "Invalid request body: {0}", "Corpo da requisição inválido: {0}"),
    ("invalid_path", "Invalid path parameter: {0}", "Parâmetro de caminho inválido: {0}"),
    ("invalid_query", "Invalid query string: {0}", "Parâmetros de busca inválidos: {0}"),
    ("contact_unavailable", "Your message could not be sent right now, please try again later.", "Não foi possível enviar a mensagem agora, tente mais tarde."),
    ("unique_violation", "{0} already exists.", "{0} já existe."),
    ("internal_error", "An unexpected error occurred.", "Ocorreu um erro inesperado."),
    // Códigos usados nas mensagens do `validator`
    ("required", "This field is required.", "Este campo é obrigatório."),
    ("invalid_email", "Invalid e-mail address.", "Endereço de e-mail inválido."),
    ("invalid_url", "Invalid URL.", "URL inválida."),
    ("password_too_short", "Password must be at least 6 characters.", "A senha deve ter no mínimo 6 caracteres."),
    ("name_too_short", "Name must be at least 2 characters.", "O nome deve ter no mínimo 2 caracteres."),
    ("title_length", "Title must be between 3 and 200 characters.", "O título deve ter entre 3 e 200 caracteres."),
    ("price_must_be_positive", "Price must be greater than zero.", "O preço deve ser maior que zero."),
    ("not_a_number", "Value must be a finite number.", "O valor deve ser um número finito."),
    ("out_of_range", "Value is out of range.", "Valor fora do intervalo permitido."),
    ("too_long", "Text is too long.", "Texto muito longo."),
    ("down_payment_exceeds_price", "Down payment cannot exceed the price.", "A entrada não pode ser maior que o preço."),
    // Respostas de sucesso
    ("logged_out", "Logged out.", "Sessão encerrada."),
    ("reset_email_sent", "If the e-mail is registered, a reset link has been sent.", "Se o e-mail estiver cadastrado, um link de redefinição foi enviado."),
    ("password_reset_done", "Password updated successfully.", "Senha atualizada com sucesso."),
    ("message_sent", "Message sent.", "Mensagem enviada."),
    ("deleted", "{0} deleted.", "{0} removido."),
];

/// Mensagens traduzidas por idioma. Barato de clonar.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut en = HashMap::new();
        let mut pt = HashMap::new();
        for (key, en_msg, pt_msg) in CATALOG {
            en.insert(*key, *en_msg);
            pt.insert(*key, *pt_msg);
        }

        let mut messages = HashMap::new();
        messages.insert("en", en);
        messages.insert("pt", pt);

        Self { messages: Arc::new(messages) }
    }

    /// Idioma desconhecido cai no inglês; chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str, arg: Option<&str>) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)))
            .copied()
            .unwrap_or(key);

        match arg {
            Some(value) => template.replace("{0}", value),
            None => template.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_languages() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "user_not_found", None), "User not found.");
        assert_eq!(store.translate("pt", "user_not_found", None), "Usuário não encontrado.");
    }

    #[test]
    fn falls_back_to_english_then_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "forbidden", None), "You do not have access to this resource.");
        assert_eq!(store.translate("pt", "some_custom_code", None), "some_custom_code");
    }

    #[test]
    fn substitutes_argument() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "resource_not_found", Some("Lead")), "Lead not found.");
    }
}
