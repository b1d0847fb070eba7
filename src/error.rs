use std::path::PathBuf;

/// Falhas fatais do gerador de assets. Nenhuma é recuperada: o binário
/// imprime a mensagem e sai com código diferente de zero.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Chave da API não encontrada (argumento, variável {var} ou arquivos .env)")]
    CredentialMissing { var: String },

    #[error("OpenAI Images API falhou com HTTP {status}: {body}")]
    RequestFailure { status: u16, body: String },

    #[error("Nenhum candidato retornado pela OpenAI Images API")]
    EmptyResult,

    #[error("Nenhum candidato existente em {}. Rode sem --skip-generate primeiro.", .0.display())]
    NoExistingCandidates(PathBuf),

    #[error("--pick {pick} fora do intervalo (existem {count} candidatos)")]
    SelectionOutOfRange { pick: usize, count: usize },

    #[error("Screenshots brutos ausentes:\n{}\n{}", .0.join("\n"), CAPTURE_HINT)]
    MissingInput(Vec<String>),

    #[error(
        "Screenshots brutos duplicados ({}). Forneça 3 arquivos distintos.\nHashes atuais: {}",
        .duplicates.join(", "),
        .hashes.iter().map(|(name, hash)| format!("{name}={hash}")).collect::<Vec<_>>().join(", ")
    )]
    DuplicateInput {
        duplicates: Vec<String>,
        hashes: Vec<(String, String)>,
    },
}

const CAPTURE_HINT: &str = "Exemplos de captura:
xcrun simctl io booted screenshot marketing/store-assets/raw/screen-world-map.png
xcrun simctl io booted screenshot marketing/store-assets/raw/screen-mini-apps.png
xcrun simctl io booted screenshot marketing/store-assets/raw/screen-team-chat.png";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_lists_every_file_and_capture_hint() {
        let err = AssetError::MissingInput(vec![
            "screen-world-map.png (ou screen-home.png)".to_string(),
            "screen-team-chat.png".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("screen-world-map.png (ou screen-home.png)"));
        assert!(msg.contains("screen-team-chat.png"));
        assert!(msg.contains("xcrun simctl io booted screenshot"));
    }

    #[test]
    fn request_failure_carries_status_and_body() {
        let err = AssetError::RequestFailure {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "OpenAI Images API falhou com HTTP 401: invalid key"
        );
    }

    #[test]
    fn selection_out_of_range_names_pick_and_count() {
        let err = AssetError::SelectionOutOfRange { pick: 5, count: 4 };
        assert!(err.to_string().contains("--pick 5"));
        assert!(err.to_string().contains("4 candidatos"));
    }
}
