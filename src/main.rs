use execution_time::ExecutionTime;
use std::process;

use consulta_validacao_de_prestadores::{
    ConsultaResult, clear_screen, consultar, exportar_resultados, extrair_cnpjs_da_busca,
    get_config, imprimir_kpis, imprimir_resultados, imprimir_versao_do_programa,
    ler_respostas_csv, normalizar,
};

fn main() {
    // A forma mais idiomática de reportar erros ao usuário final sem stack trace técnico
    if let Err(err) = run() {
        eprintln!("\n[ERRO CRÍTICO]: {err}");
        process::exit(1);
    }
}

fn run() -> ConsultaResult<()> {
    let timer = ExecutionTime::start();

    // 1. Obter Configurações
    let config = get_config()?;

    // 2. Setup inicial
    clear_screen(config.clear)?;
    imprimir_versao_do_programa();

    if config.verbose {
        println!("{:#?}\n", config);
    }

    // 3. CNPJs da busca: sem nenhum válido não há relatório a montar
    let cnpjs_busca = extrair_cnpjs_da_busca(&config.busca);

    if cnpjs_busca.is_empty() {
        println!(" Nenhum CNPJ válido encontrado na busca.\n");
        return Ok(());
    }

    println!(
        " Encontrado {:>3} CNPJ(s) válido(s) na busca.\n",
        cnpjs_busca.len()
    );

    // 4. Carregar as respostas do formulário
    let tabela = ler_respostas_csv(&config.respostas, config.delimitador)?;

    if config.verbose {
        println!(
            " Respostas carregadas de <{}>: {} linha(s).\n",
            config.respostas.display(),
            tabela.registros.len()
        );
    }

    // 5. Normalizar: um registro por CNPJ, o mais recente vence
    let tabela_base = normalizar(&tabela, &config.respostas)?;

    // 6. Montar o relatório, um resultado por CNPJ solicitado
    let resultados = consultar(&tabela_base, &cnpjs_busca);

    // 7. Exibir relatório e contagens
    imprimir_resultados(&resultados);
    imprimir_kpis(&resultados);

    // 8. Exportar CSV (opcional)
    if config.exportar {
        exportar_resultados(&resultados, &config.target, config.delimitador)?;
        println!(
            " Resultado da consulta exportado para <{}>.\n",
            config.target.display()
        );
    }

    timer.print_elapsed_time();

    Ok(())
}
