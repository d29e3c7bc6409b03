use regex::Regex;
use std::sync::LazyLock;

/// CNPJ com máscara, aceitando pontuação parcial ou ausente.
///
/// Cada grupo de dígitos é delimitado por \b para não capturar pedaços de
/// sequências numéricas maiores.
///
/// Ex: `12.345.678/0001-95`, `12345678/0001-95`
pub static RE_CNPJ_MASCARADO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}\.?\d{3}\.?\d{3}/?\d{4}-?\d{2}\b").unwrap());

/// Sequência isolada de 14 dígitos (CNPJ sem máscara).
pub static RE_CNPJ_PURO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{14}\b").unwrap());

// Regex para limpeza e validação
pub static RE_NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());
pub static RE_CNPJ_14: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{14})$").unwrap());

/// Separadores aceitos no campo de busca:
/// quebra de linha, vírgula, ponto e vírgula e pipe.
pub static RE_SEPARADORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n,;|]+").unwrap());
