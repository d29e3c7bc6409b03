use std::{io, path::PathBuf};
use thiserror::Error;

/// Tipo de retorno conveniente para todo o projeto
pub type ConsultaResult<T> = Result<T, ConsultaError>;

#[derive(Error, Debug)]
pub enum ConsultaError {
    #[error(
        "Não encontrei coluna de CNPJ!\n\
        Arquivo: {arquivo:?}\n\
        O cabeçalho precisa conter ao menos uma coluna com a palavra CNPJ."
    )]
    ColunaCnpjNaoEncontrada { arquivo: PathBuf },

    #[error("Erro no processamento CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Delimitador inválido: <{valor}>. Esperado um único caractere ASCII (ex: ',' ou ';')")]
    DelimitadorInvalido { valor: String },

    #[error("Erro de I/O: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Arquivo não encontrado!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoReader {
        #[source] // Indica que este é o erro original
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error(
        "Arquivo de respostas não definido ou inválido!\n\
        Exemplo:\n\
        consulta_validacao_de_prestadores -r 'Respostas ao formulário.csv' -b '12.345.678/0001-95'"
    )]
    RespostasNaoDefinidas,
}
