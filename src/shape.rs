use crate::models::{CleanMovie, Genre, MovieGenreRow, MovieRow};

/// Project the cleaned batch into the three table row sets. Link rows keep
/// each movie's genre list verbatim; cross-store uniqueness is the
/// reconciler's job, intra-batch pair duplicates are left to the store's
/// unique index.
pub fn shape(
    movies: &[CleanMovie],
    genre_catalog: &[Genre],
) -> (Vec<MovieRow>, Vec<Genre>, Vec<MovieGenreRow>) {
    let movie_rows = movies
        .iter()
        .map(|m| MovieRow {
            id: m.id,
            title: m.title.clone(),
            overview: m.overview.clone(),
            release_date: m.release_date.clone(),
            popularity: m.popularity,
            vote_average: m.vote_average,
            vote_count: m.vote_count,
        })
        .collect();

    let genre_rows = genre_catalog.to_vec();

    let link_rows = movies
        .iter()
        .flat_map(|m| m.genre_ids.iter().map(|&genre_id| MovieGenreRow { movie_id: m.id, genre_id }))
        .collect();

    (movie_rows, genre_rows, link_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i32, genre_ids: Vec<i32>) -> CleanMovie {
        CleanMovie {
            id,
            title: format!("Movie {id}"),
            overview: String::new(),
            release_date: "2024-01-01".to_string(),
            popularity: 1.0,
            vote_average: 5.0,
            vote_count: 10,
            genre_ids,
        }
    }

    #[test]
    fn one_movie_row_per_movie_with_seven_columns() {
        let (movie_rows, _, _) = shape(&[movie(1, vec![10]), movie(2, vec![])], &[]);
        assert_eq!(movie_rows.len(), 2);
        assert_eq!(movie_rows[0].id, 1);
        assert_eq!(movie_rows[0].title, "Movie 1");
    }

    #[test]
    fn genre_table_is_the_catalog_regardless_of_usage() {
        let catalog =
            vec![Genre { id: 10, name: "Crime".into() }, Genre { id: 99, name: "Unused".into() }];
        let (_, genre_rows, _) = shape(&[movie(1, vec![10])], &catalog);
        assert_eq!(genre_rows, catalog);
    }

    #[test]
    fn link_rows_fan_out_per_genre_id() {
        let (_, _, links) = shape(&[movie(1, vec![10, 20]), movie(2, vec![30])], &[]);
        assert_eq!(
            links,
            vec![
                MovieGenreRow { movie_id: 1, genre_id: 10 },
                MovieGenreRow { movie_id: 1, genre_id: 20 },
                MovieGenreRow { movie_id: 2, genre_id: 30 },
            ]
        );
    }

    #[test]
    fn empty_genre_list_contributes_no_links() {
        let (_, _, links) = shape(&[movie(1, vec![])], &[]);
        assert!(links.is_empty());
    }

    #[test]
    fn intra_movie_duplicates_pass_through_verbatim() {
        let (_, _, links) = shape(&[movie(1, vec![10, 10])], &[]);
        assert_eq!(links.len(), 2);
    }
}
