pub struct CreateGenreDto {
    pub name: String,
}

pub struct DeleteGenreDto {
    pub id: String,
}
