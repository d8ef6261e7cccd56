pub const MOVIES_LIST_FAILED: &str = "Falha ao listar filmes";
pub const MOVIES_FILTER_FAILED: &str = "Falha ao filtrar filmes por gênero";
pub const MOVIE_ALREADY_EXISTS: &str = "Filme já cadastrado";
pub const MOVIE_CREATE_FAILED: &str = "falha ao cadastrar um filme";
pub const MOVIE_NOT_FOUND: &str = "Filme não encontrado";
pub const MOVIE_UPDATED: &str = "Filme atualizado";
pub const MOVIE_UPDATE_FAILED: &str = "falha ao atualizar o registro do filme";
pub const MOVIE_DELETED: &str = "Filme deletado";
pub const MOVIE_DELETE_FAILED: &str = "Não foi possível remover o filme";

pub const GENRE_NAME_REQUIRED: &str = "O nome do gênero é obrigatório";
pub const GENRE_ALREADY_EXISTS: &str = "Gênero já cadastrado";
pub const GENRE_CREATE_FAILED: &str = "falha ao cadastrar o gênero";
pub const GENRE_NOT_FOUND: &str = "Gênero não encontrado";
pub const GENRE_UPDATED: &str = "Gênero atualizado";
pub const GENRE_UPDATE_FAILED: &str = "falha ao atualizar o gênero";

pub const INVALID_BODY: &str = "Corpo da requisição inválido";
