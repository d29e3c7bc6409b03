use std::fmt;

use crate::Resultado;

/// Situação consolidada da validação de um prestador.
///
/// Derivada a cada consulta a partir dos campos brutos de status; nunca é
/// armazenada na base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFinal {
    NaoEncontrado,
    DocumentosComPendencia,
    AguardandoAnalise,
    DocumentosPendentes,
    DocumentosPosAnalise,
    Inconsistente,
}

impl fmt::Display for StatusFinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texto = match self {
            StatusFinal::NaoEncontrado => "🔴 NÃO ENCONTRADO",
            StatusFinal::DocumentosComPendencia => "🔴 DOCUMENTOS COM PENDÊNCIA",
            StatusFinal::AguardandoAnalise => "🟡 AGUARDANDO ANÁLISE",
            StatusFinal::DocumentosPendentes => "🟡 DOCUMENTOS PENDENTES",
            StatusFinal::DocumentosPosAnalise => "🟢 DOCUMENTOS PÓS-ANÁLISE",
            StatusFinal::Inconsistente => "⚠️ INCONSISTENTE",
        };

        write!(f, "{}", texto)
    }
}

/// Deriva o status consolidado de um resultado de consulta.
///
/// As regras formam uma escada de precedência: a primeira que casar decide o
/// rótulo e as seguintes nem são avaliadas. Todas as comparações de texto
/// ignoram caixa. Casos fora dos padrões reconhecidos caem em
/// `Inconsistente`, para não inflar as contagens de aprovados ou pendentes.
pub fn resolver_status(resultado: &Resultado) -> StatusFinal {
    let status_comp = resultado.status_completo.trim().to_uppercase();
    let status_prest = resultado.status_prestador.trim().to_uppercase();
    let status_inst = resultado.status_instalador.trim().to_uppercase();

    // 1. Não encontrado na base
    if status_comp == "NÃO ENCONTRADO" {
        return StatusFinal::NaoEncontrado;
    }

    // 2. Problema grave: CPF sinalizado, descrição de problemas ou observação
    if resultado.problema_cpf.trim().to_uppercase() == "SIM"
        || eh_preenchido(&resultado.problemas_descricao)
        || eh_preenchido(&resultado.observacao)
    {
        return StatusFinal::DocumentosComPendencia;
    }

    // 3. Não analisado ainda
    if sem_analise(&status_prest) && sem_analise(&status_inst) {
        return StatusFinal::AguardandoAnalise;
    }

    // 4. Pendente
    if status_prest.contains("PENDENTE") || status_inst.contains("PENDENTE") {
        return StatusFinal::DocumentosPendentes;
    }

    // 5. Aprovado
    if status_prest.contains("ACEITO") && status_inst.contains("ACEITO") {
        return StatusFinal::DocumentosPosAnalise;
    }

    StatusFinal::Inconsistente
}

/// Campo de status vazio, traço ou "ND": ainda não analisado.
fn sem_analise(status: &str) -> bool {
    matches!(status, "" | "-" | "ND")
}

/// Campo livre conta como preenchido se não for vazio nem o traço de ausência.
fn eh_preenchido(valor: &str) -> bool {
    let valor = valor.trim();

    !valor.is_empty() && valor != "-"
}
