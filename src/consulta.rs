use csv::StringRecord;
use std::{collections::HashMap, fs::File, io::BufWriter, path::Path, process::Command};

use crate::{
    CANDIDATOS_DATA_VERIFICACAO, CANDIDATOS_OBSERVACAO, CANDIDATOS_PROBLEMA_CPF,
    CANDIDATOS_PROBLEMAS_DESCRICAO, CANDIDATOS_RESPONSAVEL, CANDIDATOS_STATUS_COMPLETO,
    CANDIDATOS_STATUS_INSTALADOR, CANDIDATOS_STATUS_PRESTADOR, Carimbo, ConsultaResult,
    RegistroNormalizado, StatusFinal, TabelaNormalizada, achar_coluna_por_candidatos,
    formatar_cnpj, resolver_status,
};

/// Valor exibido para campos ausentes ou em branco.
pub const SEM_INFORMACAO: &str = "-";

/// Valor literal de status completo que a escada de status reconhece como
/// registro inexistente na base.
pub const NAO_ENCONTRADO: &str = "NÃO ENCONTRADO";

/// Colunas do relatório, na ordem de exibição.
pub const COLUNAS_RELATORIO: [&str; 10] = [
    "CNPJ",
    "STATUS FINAL",
    "STATUS COMPLETO",
    "STATUS PRESTADOR",
    "STATUS INSTALADOR",
    "OBSERVAÇÃO",
    "RESPONSÁVEL",
    "DATA VERIFICAÇÃO",
    "ATUALIZADO EM",
    "PROBLEMAS",
];

/// Projeção de um registro normalizado no formato do relatório final.
///
/// Os campos `problema_cpf` e `problemas_descricao` não aparecem no
/// relatório individualmente (viram o resumo `problemas`), mas a escada de
/// status precisa deles em separado.
#[derive(Debug, Clone)]
pub struct Resultado {
    pub cnpj: String,
    pub status_completo: String,
    pub status_prestador: String,
    pub status_instalador: String,
    pub observacao: String,
    pub responsavel: String,
    pub data_verificacao: String,
    pub problemas: String,
    pub atualizado_em: String,
    pub problema_cpf: String,
    pub problemas_descricao: String,
}

/// Posições das colunas de status e apoio, resolvidas por palavras-chave.
///
/// Toda coluna aqui é opcional: a ausência vira o traço no relatório, nunca
/// erro.
#[derive(Debug, Default)]
struct ColunasDeStatus {
    status_completo: Option<usize>,
    status_prestador: Option<usize>,
    status_instalador: Option<usize>,
    responsavel: Option<usize>,
    data_verificacao: Option<usize>,
    problemas_descricao: Option<usize>,
    problema_cpf: Option<usize>,
    observacao: Option<usize>,
}

impl ColunasDeStatus {
    fn localizar(cabecalho: &[String]) -> Self {
        ColunasDeStatus {
            status_completo: achar_coluna_por_candidatos(cabecalho, CANDIDATOS_STATUS_COMPLETO),
            status_prestador: achar_coluna_por_candidatos(cabecalho, CANDIDATOS_STATUS_PRESTADOR),
            status_instalador: achar_coluna_por_candidatos(
                cabecalho,
                CANDIDATOS_STATUS_INSTALADOR,
            ),
            responsavel: achar_coluna_por_candidatos(cabecalho, CANDIDATOS_RESPONSAVEL),
            data_verificacao: achar_coluna_por_candidatos(cabecalho, CANDIDATOS_DATA_VERIFICACAO),
            problemas_descricao: achar_coluna_por_candidatos(
                cabecalho,
                CANDIDATOS_PROBLEMAS_DESCRICAO,
            ),
            problema_cpf: achar_coluna_por_candidatos(cabecalho, CANDIDATOS_PROBLEMA_CPF),
            observacao: achar_coluna_por_candidatos(cabecalho, CANDIDATOS_OBSERVACAO),
        }
    }
}

/// Monta um resultado por CNPJ solicitado, na ordem da solicitação.
///
/// CNPJs ausentes da base geram a linha-sentinela de "não encontrado"; a
/// normalização garante no máximo um registro por CNPJ para os demais.
pub fn consultar(tabela: &TabelaNormalizada, cnpjs: &[String]) -> Vec<Resultado> {
    // 1. Índice de consulta
    let indice: HashMap<&str, &RegistroNormalizado> = tabela
        .registros
        .iter()
        .map(|registro| (registro.cnpj14.as_str(), registro))
        .collect();

    // 2. Colunas de status (tolerantes a pequenas mudanças no formulário)
    let colunas = ColunasDeStatus::localizar(&tabela.cabecalho);

    // 3. Um resultado por CNPJ solicitado
    cnpjs
        .iter()
        .map(|cnpj14| match indice.get(cnpj14.as_str()) {
            Some(registro) => projetar_registro(cnpj14, registro, &colunas),
            None => resultado_nao_encontrado(cnpj14),
        })
        .collect()
}

/// Linha-sentinela para CNPJ ausente da base: todos os campos com o traço e o
/// status completo com o literal que resolve para "não encontrado".
fn resultado_nao_encontrado(cnpj14: &str) -> Resultado {
    Resultado {
        cnpj: formatar_cnpj(cnpj14),
        status_completo: NAO_ENCONTRADO.to_string(),
        status_prestador: SEM_INFORMACAO.to_string(),
        status_instalador: SEM_INFORMACAO.to_string(),
        observacao: SEM_INFORMACAO.to_string(),
        responsavel: SEM_INFORMACAO.to_string(),
        data_verificacao: SEM_INFORMACAO.to_string(),
        problemas: SEM_INFORMACAO.to_string(),
        atualizado_em: SEM_INFORMACAO.to_string(),
        problema_cpf: SEM_INFORMACAO.to_string(),
        problemas_descricao: SEM_INFORMACAO.to_string(),
    }
}

fn projetar_registro(
    cnpj14: &str,
    registro: &RegistroNormalizado,
    colunas: &ColunasDeStatus,
) -> Resultado {
    let problema_cpf = campo_ou_traco(&registro.campos, colunas.problema_cpf);
    let problemas_descricao = campo_ou_traco(&registro.campos, colunas.problemas_descricao);

    // Resumo de problemas: nota fixa de CPF + descrição livre, se houver
    let mut problemas = Vec::new();

    if problema_cpf.to_uppercase() == "SIM" {
        problemas.push("Problema no CPF".to_string());
    }
    if problemas_descricao != SEM_INFORMACAO {
        problemas.push(problemas_descricao.clone());
    }

    let problemas = if problemas.is_empty() {
        SEM_INFORMACAO.to_string()
    } else {
        problemas.join(" | ")
    };

    Resultado {
        cnpj: formatar_cnpj(cnpj14),
        status_completo: campo_ou_traco(&registro.campos, colunas.status_completo),
        status_prestador: campo_ou_traco(&registro.campos, colunas.status_prestador),
        status_instalador: campo_ou_traco(&registro.campos, colunas.status_instalador),
        observacao: campo_ou_traco(&registro.campos, colunas.observacao),
        responsavel: campo_ou_traco(&registro.campos, colunas.responsavel),
        data_verificacao: campo_ou_traco(&registro.campos, colunas.data_verificacao),
        problemas,
        atualizado_em: formatar_carimbo(&registro.carimbo),
        problema_cpf,
        problemas_descricao,
    }
}

/// Devolve o valor da coluna, ou o traço se a coluna não existir ou o campo
/// estiver em branco.
fn campo_ou_traco(registro: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| registro.get(i))
        .map(str::trim)
        .filter(|valor| !valor.is_empty())
        .map(String::from)
        .unwrap_or_else(|| SEM_INFORMACAO.to_string())
}

/// Data de atualização no formato do relatório;
/// carimbos sintéticos ou ausentes viram o traço.
fn formatar_carimbo(carimbo: &Carimbo) -> String {
    match carimbo {
        Carimbo::DataHora(data) => data.format("%d/%m/%Y %H:%M").to_string(),
        Carimbo::Ordem(_) | Carimbo::Ausente => SEM_INFORMACAO.to_string(),
    }
}

/// Imprime o relatório da consulta, um bloco por CNPJ solicitado.
pub fn imprimir_resultados(resultados: &[Resultado]) {
    println!(" --- Resultado da Consulta ---\n");

    let max_len = COLUNAS_RELATORIO
        .iter()
        .skip(1)
        .map(|coluna| coluna.chars().count())
        .max()
        .unwrap_or_default();

    for resultado in resultados {
        let status_final = resolver_status(resultado);

        let campos = [
            ("STATUS FINAL", status_final.to_string()),
            ("STATUS COMPLETO", resultado.status_completo.clone()),
            ("STATUS PRESTADOR", resultado.status_prestador.clone()),
            ("STATUS INSTALADOR", resultado.status_instalador.clone()),
            ("OBSERVAÇÃO", resultado.observacao.clone()),
            ("RESPONSÁVEL", resultado.responsavel.clone()),
            ("DATA VERIFICAÇÃO", resultado.data_verificacao.clone()),
            ("ATUALIZADO EM", resultado.atualizado_em.clone()),
            ("PROBLEMAS", resultado.problemas.clone()),
        ];

        println!(" CNPJ: {}", resultado.cnpj);

        for (nome, valor) in campos {
            println!("   {:<max_len$} : {}", nome, valor);
        }

        println!();
    }
}

/// Contagens de apoio exibidas após o relatório.
pub fn imprimir_kpis(resultados: &[Resultado]) {
    let mut aprovados = 0;
    let mut pendentes = 0;
    let mut nao_encontrados = 0;

    for resultado in resultados {
        match resolver_status(resultado) {
            StatusFinal::DocumentosPosAnalise => aprovados += 1,
            StatusFinal::DocumentosPendentes | StatusFinal::DocumentosComPendencia => {
                pendentes += 1
            }
            StatusFinal::NaoEncontrado => nao_encontrados += 1,
            StatusFinal::AguardandoAnalise | StatusFinal::Inconsistente => (),
        }
    }

    println!(
        " Aprovados: {} | Pendentes: {} | Não encontrados: {}\n",
        aprovados, pendentes, nao_encontrados
    );
}

/// Exporta o relatório em CSV com as mesmas colunas da exibição.
pub fn exportar_resultados(
    resultados: &[Resultado],
    target: &Path,
    delimitador: u8,
) -> ConsultaResult<()> {
    let file = File::create(target)?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimitador)
        .from_writer(BufWriter::with_capacity(1024 * 1024, file));

    wtr.write_record(COLUNAS_RELATORIO)?;

    for resultado in resultados {
        let status_final = resolver_status(resultado).to_string();

        wtr.write_record([
            resultado.cnpj.as_str(),
            status_final.as_str(),
            resultado.status_completo.as_str(),
            resultado.status_prestador.as_str(),
            resultado.status_instalador.as_str(),
            resultado.observacao.as_str(),
            resultado.responsavel.as_str(),
            resultado.data_verificacao.as_str(),
            resultado.atualizado_em.as_str(),
            resultado.problemas.as_str(),
        ])?;
    }

    wtr.flush()?;

    Ok(())
}

/// Limpar a tela.
pub fn clear_screen(clear_screen: bool) -> ConsultaResult<()> {
    if clear_screen {
        if cfg!(target_os = "windows") {
            // No Windows, 'cls' é um comando interno do 'cmd'.
            Command::new("cmd").args(["/c", "cls"]).status()?;
        } else {
            // Em Linux/macOS, o comando 'clear' costuma ser um executável independente.
            Command::new("clear").status()?;
        }
    }

    Ok(())
}

/// Exibe a descrição e a versão do programa.
pub fn imprimir_versao_do_programa() {
    let descr = [
        "Este programa consulta o status de validação de documentos de prestadores.",
        "As respostas do formulário de priorização são lidas de um arquivo CSV.",
        "Cada resposta pode citar vários CNPJs; cada CNPJ é uma chave de 14 dígitos.",
        "Para cada CNPJ é retida apenas a resposta enviada mais recentemente.",
        "A busca aceita CNPJs com ou sem máscara, separados por vírgula, ponto e vírgula, pipe ou quebra de linha.",
    ];

    // Loop de impressão da descrição
    for line in &descr {
        println!(" {}", line);
    }

    println!(
        "\n Consulta rápida do status de validação de documentos (uso interno).\n versão: {}\n",
        env!("CARGO_PKG_VERSION")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tabela, extrair_cnpjs_da_busca, normalizar};
    use csv::StringRecord;
    use std::path::PathBuf;

    const CABECALHO: &[&str] = &[
        "Carimbo de data/hora",
        "CNPJ priorizado",
        "STATUS COMPLETO",
        "STATUS (ACEITO/PENDENTE)",
        "STATUS (ACEITO/PENDENTE)2",
        "Observação",
        "Responsavel pela verificação",
        "Data de verificação dos documentos",
        "Problemas encontrados (descrição)",
        "Problema no CPF?",
    ];

    fn tabela_normalizada(linhas: &[&[&str]]) -> TabelaNormalizada {
        let tabela = Tabela {
            cabecalho: CABECALHO.iter().map(|s| s.to_string()).collect(),
            registros: linhas
                .iter()
                .map(|campos| StringRecord::from(campos.to_vec()))
                .collect(),
        };

        normalizar(&tabela, &PathBuf::from("respostas.csv")).unwrap()
    }

    #[test]
    fn cnpj_ausente_gera_linha_sentinela() {
        let tabela = tabela_normalizada(&[]);

        let resultados = consultar(&tabela, &["12345678000195".to_string()]);

        assert_eq!(resultados.len(), 1);

        let resultado = &resultados[0];
        assert_eq!(resultado.cnpj, "12.345.678/0001-95");
        assert_eq!(resultado.status_completo, NAO_ENCONTRADO);
        assert_eq!(resultado.status_prestador, SEM_INFORMACAO);
        assert_eq!(resultado.status_instalador, SEM_INFORMACAO);
        assert_eq!(resultado.observacao, SEM_INFORMACAO);
        assert_eq!(resultado.responsavel, SEM_INFORMACAO);
        assert_eq!(resultado.data_verificacao, SEM_INFORMACAO);
        assert_eq!(resultado.problemas, SEM_INFORMACAO);
        assert_eq!(resultado.atualizado_em, SEM_INFORMACAO);

        // A sentinela resolve para o rótulo de não encontrado
        assert_eq!(resolver_status(resultado), StatusFinal::NaoEncontrado);
    }

    #[test]
    fn projeta_campos_do_registro_mais_recente() {
        let tabela = tabela_normalizada(&[
            &[
                "01/02/2024 10:00:00",
                "12.345.678/0001-95",
                "Completo",
                "PENDENTE",
                "PENDENTE",
                "",
                "Ana",
                "01/02/2024",
                "",
                "Não",
            ],
            &[
                "05/03/2024 09:30:00",
                "12.345.678/0001-95",
                "Completo",
                "ACEITO",
                "ACEITO",
                "",
                "Bruno",
                "05/03/2024",
                "",
                "Não",
            ],
        ]);

        let resultados = consultar(&tabela, &["12345678000195".to_string()]);
        let resultado = &resultados[0];

        assert_eq!(resultado.status_prestador, "ACEITO");
        assert_eq!(resultado.responsavel, "Bruno");
        assert_eq!(resultado.atualizado_em, "05/03/2024 09:30");
        // Campos em branco viram o traço
        assert_eq!(resultado.observacao, SEM_INFORMACAO);

        assert_eq!(
            resolver_status(resultado),
            StatusFinal::DocumentosPosAnalise
        );
    }

    #[test]
    fn resultados_seguem_a_ordem_da_solicitacao() {
        let tabela = tabela_normalizada(&[&[
            "01/02/2024 10:00:00",
            "98.765.432/0001-10",
            "Completo",
            "ACEITO",
            "ACEITO",
            "",
            "Ana",
            "01/02/2024",
            "",
            "Não",
        ]]);

        let cnpjs = vec!["12345678000195".to_string(), "98765432000110".to_string()];
        let resultados = consultar(&tabela, &cnpjs);

        assert_eq!(resultados[0].cnpj, "12.345.678/0001-95");
        assert_eq!(resultados[1].cnpj, "98.765.432/0001-10");
    }

    #[test]
    fn busca_deduplicada_gera_um_unico_resultado() {
        let tabela = tabela_normalizada(&[]);

        let cnpjs = extrair_cnpjs_da_busca("12345678000195\n12.345.678/0001-95");
        let resultados = consultar(&tabela, &cnpjs);

        assert_eq!(resultados.len(), 1);
    }

    #[test]
    fn resumo_de_problemas_concatena_cpf_e_descricao() {
        let tabela = tabela_normalizada(&[&[
            "01/02/2024 10:00:00",
            "12.345.678/0001-95",
            "Completo",
            "ACEITO",
            "ACEITO",
            "",
            "Ana",
            "01/02/2024",
            "procuração vencida",
            "SIM",
        ]]);

        let resultados = consultar(&tabela, &["12345678000195".to_string()]);
        let resultado = &resultados[0];

        assert_eq!(resultado.problemas, "Problema no CPF | procuração vencida");
        assert_eq!(
            resolver_status(resultado),
            StatusFinal::DocumentosComPendencia
        );
    }

    #[test]
    fn colunas_opcionais_ausentes_viram_traco() {
        // Base mínima: só carimbo e CNPJ
        let tabela = Tabela {
            cabecalho: vec![
                "Carimbo de data/hora".to_string(),
                "CNPJ priorizado".to_string(),
            ],
            registros: vec![StringRecord::from(vec![
                "01/02/2024 10:00:00",
                "12345678000195",
            ])],
        };

        let normalizada = normalizar(&tabela, &PathBuf::from("respostas.csv")).unwrap();
        let resultados = consultar(&normalizada, &["12345678000195".to_string()]);
        let resultado = &resultados[0];

        assert_eq!(resultado.status_completo, SEM_INFORMACAO);
        assert_eq!(resultado.responsavel, SEM_INFORMACAO);
        assert_eq!(resultado.problemas, SEM_INFORMACAO);
        // Registro existe e nenhum status foi lançado: aguardando análise
        assert_eq!(resolver_status(resultado), StatusFinal::AguardandoAnalise);
    }

    #[test]
    fn linha_nao_encontrada_explodida_em_duas() {
        // Cenário: uma resposta cita dois CNPJs e o status completo é
        // "NÃO ENCONTRADO"; ambos os resultados herdam o rótulo.
        let tabela = tabela_normalizada(&[&[
            "01/02/2024 10:00:00",
            "12.345.678/0001-95 / 98.765.432/0001-10",
            "NÃO ENCONTRADO",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ]]);

        assert_eq!(tabela.registros.len(), 2);

        let cnpjs = vec!["12345678000195".to_string(), "98765432000110".to_string()];

        for resultado in consultar(&tabela, &cnpjs) {
            assert_eq!(resolver_status(&resultado), StatusFinal::NaoEncontrado);
        }
    }
}
