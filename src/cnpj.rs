use std::collections::HashSet;

use crate::{RE_CNPJ_MASCARADO, RE_CNPJ_PURO, RE_NON_DIGITS, RE_SEPARADORES};

/// Remove tudo que não for dígito.
pub fn limpar_cnpj(valor: &str) -> String {
    RE_NON_DIGITS.replace_all(valor, "").into_owned()
}

/// Aplica a máscara padrão `XX.XXX.XXX/XXXX-XX`.
///
/// Se o valor limpo não tiver exatamente 14 dígitos, devolve o valor limpo
/// sem máscara.
///
/// ### Exemplo
/// ```
/// use consulta_validacao_de_prestadores::formatar_cnpj;
///
/// assert_eq!(formatar_cnpj("12345678000195"), "12.345.678/0001-95");
/// assert_eq!(formatar_cnpj("cnpj: 12345678000195"), "12.345.678/0001-95");
/// assert_eq!(formatar_cnpj("123"), "123");
/// ```
pub fn formatar_cnpj(cnpj: &str) -> String {
    let cnpj14 = limpar_cnpj(cnpj);

    if cnpj14.len() != 14 {
        return cnpj14;
    }

    format!(
        "{}.{}.{}/{}-{}",
        &cnpj14[..2],
        &cnpj14[2..5],
        &cnpj14[5..8],
        &cnpj14[8..12],
        &cnpj14[12..]
    )
}

/// Extrai CNPJs (com máscara ou 14 dígitos puros) de qualquer texto.
///
/// A ordem de primeira ocorrência é preservada e repetições são descartadas.
/// Candidatos que não fecharem em exatamente 14 dígitos após a limpeza são
/// ignorados.
pub fn extrair_cnpjs_do_texto(texto: &str) -> Vec<String> {
    // 1. Captura CNPJ mascarado e também 14 dígitos puros
    let mascarados = RE_CNPJ_MASCARADO.find_iter(texto).map(|m| m.as_str());
    let puros = RE_CNPJ_PURO.find_iter(texto).map(|m| m.as_str());

    // 2. Limpeza: mantém somente candidatos com exatamente 14 dígitos
    let encontrados = mascarados
        .chain(puros)
        .map(limpar_cnpj)
        .filter(|c14| c14.len() == 14);

    // 3. De-dup mantendo a ordem
    deduplicar_mantendo_ordem(encontrados)
}

/// Extrai CNPJs do texto digitado na busca (aceita vários separadores).
///
/// O texto é quebrado por quebra de linha, vírgula, ponto e vírgula e pipe;
/// cada pedaço passa pelo extrator de texto livre. Assim o usuário pode colar
/// uma lista crua com separadores e máscaras misturados.
///
/// ### Exemplo
/// ```
/// use consulta_validacao_de_prestadores::extrair_cnpjs_da_busca;
///
/// let entrada = "12345678000195\n12.345.678/0001-95; 98.765.432/0001-10";
/// let cnpjs = extrair_cnpjs_da_busca(entrada);
///
/// assert_eq!(cnpjs, vec!["12345678000195", "98765432000110"]);
/// ```
pub fn extrair_cnpjs_da_busca(entrada: &str) -> Vec<String> {
    if entrada.trim().is_empty() {
        return Vec::new();
    }

    // Se o usuário colar "CNPJ / CNPJ" ou texto junto, extraímos todos
    let cnpjs = RE_SEPARADORES
        .split(entrada)
        .flat_map(extrair_cnpjs_do_texto);

    deduplicar_mantendo_ordem(cnpjs)
}

/// O HashSet serve apenas como teste de pertinência;
/// a saída preserva a ordem de primeira ocorrência.
fn deduplicar_mantendo_ordem<I>(itens: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut vistos = HashSet::new();

    itens
        .into_iter()
        .filter(|cnpj| vistos.insert(cnpj.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrai_mascarado_e_puro_na_ordem() {
        let texto = "Prioridade: 12.345.678/0001-95 / 98765432000110 (urgente)";

        assert_eq!(
            extrair_cnpjs_do_texto(texto),
            vec!["12345678000195", "98765432000110"]
        );
    }

    #[test]
    fn descarta_sequencias_de_tamanho_errado() {
        // 13 e 15 dígitos não são CNPJ
        let texto = "1234567800019 123456780001955 12.345.678/0001-9";

        assert!(extrair_cnpjs_do_texto(texto).is_empty());
    }

    #[test]
    fn toda_saida_tem_14_digitos() {
        let texto = "a 12.345.678/0001-95 b 11222333000181 c 00.000.000/0001-91 d";

        for cnpj in extrair_cnpjs_do_texto(texto) {
            assert_eq!(cnpj.len(), 14);
            assert!(cnpj.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn deduplica_preservando_primeira_ocorrencia() {
        let texto = "98765432000110 12345678000195 98.765.432/0001-10";

        assert_eq!(
            extrair_cnpjs_do_texto(texto),
            vec!["98765432000110", "12345678000195"]
        );
    }

    #[test]
    fn texto_vazio_nao_extrai_nada() {
        assert!(extrair_cnpjs_do_texto("").is_empty());
        assert!(extrair_cnpjs_da_busca("").is_empty());
        assert!(extrair_cnpjs_da_busca("   \n  ").is_empty());
    }

    #[test]
    fn busca_aceita_separadores_misturados() {
        let entrada = "12.345.678/0001-95,98765432000110;11.222.333/0001-81|00000000000191";

        assert_eq!(
            extrair_cnpjs_da_busca(entrada),
            vec![
                "12345678000195",
                "98765432000110",
                "11222333000181",
                "00000000000191"
            ]
        );
    }

    #[test]
    fn busca_deduplica_mascarado_com_puro() {
        let entrada = "12345678000195\n12.345.678/0001-95";

        assert_eq!(extrair_cnpjs_da_busca(entrada), vec!["12345678000195"]);
    }

    #[test]
    fn mascara_de_ida_e_volta() {
        let texto = "consulta 12345678000195";
        let cnpj14 = &extrair_cnpjs_do_texto(texto)[0];

        let mascarado = formatar_cnpj(cnpj14);
        assert_eq!(mascarado, "12.345.678/0001-95");

        // Reextrair o valor mascarado devolve o mesmo CNPJ de 14 dígitos
        assert_eq!(extrair_cnpjs_do_texto(&mascarado), vec![cnpj14.as_str()]);
    }

    #[test]
    fn formatar_preserva_valor_invalido_limpo() {
        assert_eq!(formatar_cnpj("12.345"), "12345");
        assert_eq!(formatar_cnpj(""), "");
    }
}
