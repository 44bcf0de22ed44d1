//! Shell layer - console menu over the core operations
//!
//! The shell reads one line at a time, runs the chosen action inside its own database
//! transaction and reports the outcome. A failed action is rolled back, reported and
//! the menu is shown again; only the exit option or the end of input stop the loop.

/// Menu actions (create, list, update, delete)
pub mod commands;
/// Line-oriented prompts
pub mod prompt;
/// Text formatting of entities and listings
pub mod render;

use crate::errors::Result;
use sea_orm::DatabaseConnection;
use std::io::{BufRead, Write};
use tracing::{error, info};

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    /// 1
    CrearArticulo,
    /// 2
    CrearCliente,
    /// 3
    CrearCompra,
    /// 4
    ListarTodo,
    /// 5
    ActualizarArticulo,
    /// 6
    ActualizarCliente,
    /// 7
    ActualizarEstadoCompra,
    /// 8
    BorrarCompra,
    /// 9
    Salir,
}

impl MenuOption {
    /// All options in menu order.
    pub const ALL: [Self; 9] = [
        Self::CrearArticulo,
        Self::CrearCliente,
        Self::CrearCompra,
        Self::ListarTodo,
        Self::ActualizarArticulo,
        Self::ActualizarCliente,
        Self::ActualizarEstadoCompra,
        Self::BorrarCompra,
        Self::Salir,
    ];

    /// Parses the number typed at the menu prompt.
    #[must_use]
    pub fn from_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.trim().parse().ok()?;
        Self::ALL.get(index.checked_sub(1)?).copied()
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CrearArticulo => "Crear artículo",
            Self::CrearCliente => "Crear cliente",
            Self::CrearCompra => "Crear compra",
            Self::ListarTodo => "Listar todo",
            Self::ActualizarArticulo => "Actualizar artículo",
            Self::ActualizarCliente => "Actualizar cliente",
            Self::ActualizarEstadoCompra => "Actualizar estado de compra",
            Self::BorrarCompra => "Borrar compra",
            Self::Salir => "Salir",
        }
    }
}

/// Interactive session state: the database plus the console streams.
pub struct Shell<R, W> {
    database: DatabaseConnection,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Creates a shell reading from `input` and writing to `output`.
    #[must_use]
    pub const fn new(database: DatabaseConnection, input: R, output: W) -> Self {
        Self {
            database,
            input,
            output,
        }
    }

    /// Everything written so far.
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// Runs the menu loop until the user exits or input ends.
    ///
    /// Only console write failures end the loop with an error; action failures are
    /// reported and the loop continues.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "--- Gestión e-commerce ---")?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.read_menu_choice()? else {
                info!("End of input, leaving the menu");
                break;
            };

            let Some(option) = MenuOption::from_choice(&choice) else {
                writeln!(
                    self.output,
                    "❌ Opción no válida: '{choice}'. Elija un número del 1 al 9."
                )?;
                continue;
            };

            if option == MenuOption::Salir {
                break;
            }

            if let Err(e) = self.dispatch(option).await {
                error!("Error in action `{}`: {:?}", option.label(), e);
                writeln!(self.output, "❌ {e}")?;
            }
        }

        writeln!(self.output, "Aplicación finalizada")?;
        self.output.flush()?;
        Ok(())
    }

    async fn dispatch(&mut self, option: MenuOption) -> Result<()> {
        match option {
            MenuOption::CrearArticulo => self.crear_articulo().await,
            MenuOption::CrearCliente => self.crear_cliente().await,
            MenuOption::CrearCompra => self.crear_compra().await,
            MenuOption::ListarTodo => self.listar_todo().await,
            MenuOption::ActualizarArticulo => self.actualizar_articulo().await,
            MenuOption::ActualizarCliente => self.actualizar_cliente().await,
            MenuOption::ActualizarEstadoCompra => self.actualizar_estado_compra().await,
            MenuOption::BorrarCompra => self.borrar_compra().await,
            MenuOption::Salir => Ok(()),
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        for (index, option) in MenuOption::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, option.label())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_option_from_choice() {
        assert_eq!(
            MenuOption::from_choice("1"),
            Some(MenuOption::CrearArticulo)
        );
        assert_eq!(MenuOption::from_choice(" 9 "), Some(MenuOption::Salir));
        assert_eq!(MenuOption::from_choice("0"), None);
        assert_eq!(MenuOption::from_choice("10"), None);
        assert_eq!(MenuOption::from_choice("uno"), None);
        assert_eq!(MenuOption::from_choice(""), None);
    }

    #[test]
    fn test_menu_labels_are_unique() {
        let mut labels: Vec<&str> = MenuOption::ALL.iter().map(|o| o.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), MenuOption::ALL.len());
    }
}
