use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use crate::{
    CANDIDATOS_CARIMBO, CANDIDATOS_CNPJ, ConsultaError, ConsultaResult, RE_CNPJ_14,
    achar_coluna_por_candidatos, extrair_cnpjs_do_texto,
};

/// Tabela bruta com as respostas do formulário: cabeçalho + registros,
/// exatamente como enviados.
#[derive(Debug, Default)]
pub struct Tabela {
    pub cabecalho: Vec<String>,
    pub registros: Vec<StringRecord>,
}

/// Origem do ordenamento temporal de um registro.
///
/// A ordem derivada garante que, na ordenação decrescente, registros com data
/// real venham primeiro e valores ilegíveis fiquem por último.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Carimbo {
    /// Valor vazio ou ilegível na coluna de data.
    Ausente,
    /// Índice sintético de ordem de chegada (tabela sem coluna de data).
    Ordem(usize),
    /// Data e hora de envio da resposta.
    DataHora(NaiveDateTime),
}

/// Resposta já vinculada a exatamente um CNPJ de 14 dígitos.
#[derive(Debug, Clone)]
pub struct RegistroNormalizado {
    pub cnpj14: String,
    pub carimbo: Carimbo,
    pub campos: StringRecord,
}

/// Tabela reduzida a no máximo um registro por CNPJ: o mais recente.
#[derive(Debug, Default)]
pub struct TabelaNormalizada {
    pub cabecalho: Vec<String>,
    pub registros: Vec<RegistroNormalizado>,
}

/// Carrega o arquivo CSV de respostas do formulário.
///
/// Qualquer falha de leitura é fatal para a consulta inteira: sem a base não
/// há o que responder.
pub fn ler_respostas_csv(path: &Path, delimitador: u8) -> ConsultaResult<Tabela> {
    let file = File::open(path).map_err(|e| ConsultaError::IoReader {
        source: e,
        arquivo: path.to_path_buf(),
    })?;

    // Abertura eficiente do arquivo com BufReader aumentado para 128KB
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimitador)
        .has_headers(true) // O crate gerencia o cabeçalho automaticamente
        .flexible(false) // Garante integridade (erro se o num de colunas variar)
        .trim(csv::Trim::All) // Trim automático em todos os campos
        .buffer_capacity(128 * 1024)
        .from_reader(BufReader::new(file));

    let cabecalho: Vec<String> = rdr.headers()?.iter().map(String::from).collect();

    let registros = rdr
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

    Ok(Tabela {
        cabecalho,
        registros,
    })
}

/// Formatos aceitos para o carimbo de envio (padrão brasileiro, dia primeiro).
const FORMATOS_DATA_HORA: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const FORMATOS_DATA: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Converte o texto da coluna de data em [`Carimbo`].
///
/// Valores vazios ou ilegíveis viram `Ausente`, nunca erro.
pub fn parse_carimbo(valor: &str) -> Carimbo {
    let valor = valor.trim();

    if valor.is_empty() {
        return Carimbo::Ausente;
    }

    for formato in FORMATOS_DATA_HORA {
        if let Ok(data) = NaiveDateTime::parse_from_str(valor, formato) {
            return Carimbo::DataHora(data);
        }
    }

    // Datas sem horário: meia-noite implícita
    for formato in FORMATOS_DATA {
        if let Ok(data) = NaiveDate::parse_from_str(valor, formato) {
            return Carimbo::DataHora(data.and_time(NaiveTime::MIN));
        }
    }

    Carimbo::Ausente
}

/// Normaliza a tabela de respostas em duas etapas:
/// explosão (1 registro por CNPJ citado) e colapso (só o mais recente fica).
pub fn normalizar(tabela: &Tabela, arquivo: &Path) -> ConsultaResult<TabelaNormalizada> {
    let explodidos = explodir_por_cnpj(tabela, arquivo)?;
    let registros = colapsar_mais_recente(explodidos);

    Ok(TabelaNormalizada {
        cabecalho: tabela.cabecalho.clone(),
        registros,
    })
}

/// Etapa 1: explode cada resposta em um registro por CNPJ citado no campo de
/// priorização.
///
/// Linhas sem nenhum CNPJ válido desaparecem da tabela: não carregam
/// identificador consultável.
pub fn explodir_por_cnpj(
    tabela: &Tabela,
    arquivo: &Path,
) -> ConsultaResult<Vec<RegistroNormalizado>> {
    // 1. Localizar a coluna de CNPJ (obrigatória)
    let idx_cnpj = achar_coluna_por_candidatos(&tabela.cabecalho, CANDIDATOS_CNPJ).ok_or_else(
        || ConsultaError::ColunaCnpjNaoEncontrada {
            arquivo: arquivo.to_path_buf(),
        },
    )?;

    // 2. Coluna de carimbo (opcional): sem ela, vale a ordem de chegada
    let idx_carimbo = achar_coluna_por_candidatos(&tabela.cabecalho, CANDIDATOS_CARIMBO);

    // 3. Uma linha pode citar vários CNPJs; cada um vira um registro próprio
    let registros = tabela
        .registros
        .iter()
        .enumerate()
        .flat_map(|(ordem, registro)| {
            let carimbo = match idx_carimbo {
                Some(idx) => parse_carimbo(registro.get(idx).unwrap_or_default()),
                None => Carimbo::Ordem(ordem),
            };

            let texto_cnpj = registro.get(idx_cnpj).unwrap_or_default();

            extrair_cnpjs_do_texto(texto_cnpj)
                .into_iter()
                // Segunda linha de defesa contra anomalias de digitação
                .filter(|cnpj14| RE_CNPJ_14.is_match(cnpj14))
                .map(|cnpj14| RegistroNormalizado {
                    cnpj14,
                    carimbo,
                    campos: registro.clone(),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(registros)
}

/// Etapa 2: mantém somente o registro mais recente de cada CNPJ.
///
/// A ordenação é estável e decrescente apenas no carimbo; empates preservam a
/// ordem original das linhas.
pub fn colapsar_mais_recente(mut registros: Vec<RegistroNormalizado>) -> Vec<RegistroNormalizado> {
    registros.sort_by(|a, b| b.carimbo.cmp(&a.carimbo));

    let mut vistos = HashSet::new();

    registros
        .into_iter()
        .filter(|registro| vistos.insert(registro.cnpj14.clone()))
        .collect()
}
