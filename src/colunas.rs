//! Localização de colunas por palavras-chave.
//!
//! O formulário de priorização muda de redação com alguma frequência, então
//! nenhuma coluna é procurada por nome exato: o cabeçalho é normalizado e
//! testado contra listas ordenadas de palavras-chave, vencendo o primeiro
//! candidato que casar.

/// Candidatos para a coluna com os CNPJs citados na resposta.
/// A ausência desta coluna é erro fatal.
pub static CANDIDATOS_CNPJ: &[&[&str]] = &[&["CNPJ", "PRIOR"], &["CNPJ"]];

/// Candidatos para o carimbo de data/hora de envio da resposta.
/// Sem esta coluna, vale a ordem de chegada das linhas.
pub static CANDIDATOS_CARIMBO: &[&[&str]] = &[&["CARIMBO", "DATA"], &["DATA/HORA"]];

// Colunas de status e apoio (todas opcionais no relatório)
pub static CANDIDATOS_STATUS_COMPLETO: &[&[&str]] = &[&["STATUS", "COMPLETO"]];
pub static CANDIDATOS_STATUS_PRESTADOR: &[&[&str]] = &[&["STATUS", "ACEITO/PENDENTE"]];
pub static CANDIDATOS_STATUS_INSTALADOR: &[&[&str]] = &[&["STATUS", "ACEITO/PENDENTE)2"]];
pub static CANDIDATOS_RESPONSAVEL: &[&[&str]] = &[&["RESPONSAVEL"], &["RESPONSAVEL", "VERIFIC"]];
pub static CANDIDATOS_DATA_VERIFICACAO: &[&[&str]] = &[&["DATA", "VERIFIC"]];
pub static CANDIDATOS_PROBLEMAS_DESCRICAO: &[&[&str]] = &[&["PROBLEMAS", "DESCRI"]];
pub static CANDIDATOS_PROBLEMA_CPF: &[&[&str]] = &[&["PROBLEMA", "CPF"]];
pub static CANDIDATOS_OBSERVACAO: &[&[&str]] =
    &[&["OBSERVA"], &["OBSERVAÇÃO"], &["OBSERVACAO"]];

/// Normaliza o texto do cabeçalho: maiúsculas, quebras de linha viram espaço.
pub fn normalizar_cabecalho(nome: &str) -> String {
    nome.to_uppercase().replace('\n', " ").trim().to_string()
}

/// Acha a posição da coluna cujo cabeçalho normalizado contém *todas* as
/// palavras-chave, ignorando caixa, espaços e quebras de linha.
pub fn achar_coluna(cabecalho: &[String], palavras: &[&str]) -> Option<usize> {
    let palavras: Vec<String> = palavras.iter().map(|p| p.to_uppercase()).collect();

    cabecalho.iter().position(|col| {
        let col_norm = normalizar_cabecalho(col);
        palavras.iter().all(|p| col_norm.contains(p))
    })
}

/// Tenta uma lista ordenada de conjuntos de palavras-chave;
/// o primeiro conjunto que casar com alguma coluna vence.
pub fn achar_coluna_por_candidatos(cabecalho: &[String], candidatos: &[&[&str]]) -> Option<usize> {
    candidatos
        .iter()
        .find_map(|palavras| achar_coluna(cabecalho, palavras))
}
