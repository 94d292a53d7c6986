use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Name, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Name, 200))
                    .col(string_len(Movies::Director, 100))
                    .col(integer(Movies::Year))
                    .col(string_len_null(Movies::PosterUrl, 300))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserMovies::Table)
                    .if_not_exists()
                    .col(integer(UserMovies::UserId))
                    .col(integer(UserMovies::MovieId))
                    .primary_key(Index::create().col(UserMovies::UserId).col(UserMovies::MovieId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_movies_user")
                            .from(UserMovies::Table, UserMovies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_movies_movie")
                            .from(UserMovies::Table, UserMovies::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_movies_movie")
                    .table(UserMovies::Table)
                    .col(UserMovies::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserMovies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Name,
    Director,
    Year,
    PosterUrl,
}

#[derive(DeriveIden)]
enum UserMovies {
    Table,
    UserId,
    MovieId,
}
