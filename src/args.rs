use clap::Parser;
use rand::Rng;
use std::{fs, path::PathBuf};

use crate::{ConsultaError, ConsultaResult};

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Arquivo de texto com CNPJs a consultar (aceita os mesmos separadores da busca)
    #[arg(short, long)]
    arquivo_busca: Option<PathBuf>,

    /// CNPJs a consultar, com ou sem máscara.
    ///
    /// Vários CNPJs podem ser separados por vírgula, ponto e vírgula,
    /// pipe ou quebra de linha.
    #[arg(short, long)]
    busca: Option<String>,

    /// Clear screen
    #[arg(short, long, default_value_t = false)]
    clear: bool,

    /// Delimitador de campos do arquivo CSV de respostas
    #[arg(short, long, default_value_t = ',')]
    delimitador: char,

    /// Exportar o resultado da consulta em arquivo CSV
    #[arg(short = 'x', long, default_value_t = false)]
    exportar: bool,

    /// Arquivo CSV com as respostas do formulário de priorização.
    ///
    /// Arquivo esperado:
    ///
    /// - `Priorização de validação de documentos (respostas).csv`
    #[arg(short, long, required = true)]
    respostas: Option<PathBuf>,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug)]
pub struct Config {
    pub busca: String,
    pub clear: bool,
    pub delimitador: u8,
    pub exportar: bool,
    pub respostas: PathBuf,
    pub verbose: bool,

    pub target: PathBuf,
}

pub fn get_config() -> ConsultaResult<Config> {
    let args = Arguments::parse();

    // 1. Extração funcional: Converte Option<PathBuf> em PathBuf ou retorna erro
    // Como o Clap já exige 'required = true', este erro só ocorreria em casos extremos.
    let respostas = args.respostas.ok_or(ConsultaError::RespostasNaoDefinidas)?;

    // 2. Texto da busca: argumento direto e/ou arquivo com a lista de CNPJs
    let mut busca = args.busca.unwrap_or_default();

    if let Some(path) = &args.arquivo_busca {
        let conteudo = fs::read_to_string(path).map_err(|e| ConsultaError::IoReader {
            source: e,
            arquivo: path.clone(),
        })?;

        if !busca.is_empty() {
            busca.push('\n');
        }
        busca.push_str(&conteudo);
    }

    // 3. O crate csv trabalha com delimitador de um único byte
    let delimitador =
        u8::try_from(args.delimitador).map_err(|_| ConsultaError::DelimitadorInvalido {
            valor: args.delimitador.to_string(),
        })?;

    // 4. Geração do Target (Funcional)
    let mut rng = rand::rng();
    let file_name = format!(
        "ZZZ-{:06}-Resultado da Consulta de Validacao.csv",
        rng.random_range(0..999999)
    );

    Ok(Config {
        busca,
        clear: args.clear,
        delimitador,
        exportar: args.exportar,
        respostas,
        verbose: args.verbose,
        target: PathBuf::from(&file_name),
    })
}
