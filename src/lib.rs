mod args;
mod cnpj;
mod colunas;
mod consulta;
mod error;
mod regex;
mod respostas;
mod status;

pub use self::{
    args::*, cnpj::*, colunas::*, consulta::*, error::*, regex::*, respostas::*, status::*,
};
