//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use staykey_auth::{
    AppState, AuthError,
    middleware::{require_admin, require_authenticated},
    models::{
        Account, NewAccount, NewApartment, NewKeyCode, NewStay, UpdateAccount, UpdateApartment,
        UpdateKeyCode,
    },
    repositories::Store,
    validation::{
        normalize_email, validate_apartment, validate_email, validate_key_code, validate_name,
        validate_password, validate_stay_window,
    },
    visibility,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        ApartmentDetail, CreateUserRequest, DashboardResponse, UpdateApartmentRequest,
        UpdateKeyCodeRequest, UpdateUserRequest, UserDetail, UserSummary,
    },
};

/// Create the router for the API service
pub fn create_router<S: Store>(state: AppState<S>) -> Router {
    let guest_routes = Router::new()
        .route("/key-codes", get(list_key_codes::<S>))
        .route("/dashboard", get(dashboard::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authenticated::<S>,
        ));

    let admin_routes = Router::new()
        .route("/key-codes", post(create_key_code::<S>))
        .route(
            "/key-codes/:id",
            get(get_key_code::<S>)
                .put(update_key_code::<S>)
                .delete(delete_key_code::<S>),
        )
        .route(
            "/apartments",
            get(list_apartments::<S>).post(create_apartment::<S>),
        )
        .route(
            "/apartments/:id",
            get(get_apartment::<S>)
                .put(update_apartment::<S>)
                .delete(delete_apartment::<S>),
        )
        .route("/users", get(list_users::<S>).post(create_user::<S>))
        .route(
            "/users/:id",
            get(get_user::<S>)
                .put(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .route("/visits", get(list_visits::<S>).post(create_visit::<S>))
        .route("/visits/:id", axum::routing::delete(delete_visit::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin::<S>,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(guest_routes)
        .merge(admin_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Key codes the caller may currently see
pub async fn list_key_codes<S: Store>(
    State(state): State<AppState<S>>,
    Extension(account): Extension<Account>,
) -> ApiResult<impl IntoResponse> {
    let key_codes =
        visibility::visible_key_codes(&state.store, &state.store, &account, Utc::now()).await?;

    Ok(Json(json!({ "keyCodes": key_codes })))
}

/// Get a single key code
pub async fn get_key_code<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let key_code = state
        .store
        .find_key_code(id)
        .await?
        .ok_or(ApiError::NotFound("Key code"))?;

    Ok(Json(json!({ "keyCode": key_code })))
}

/// Create a key code
pub async fn create_key_code<S: Store>(
    State(state): State<AppState<S>>,
    Json(payload): Json<NewKeyCode>,
) -> ApiResult<impl IntoResponse> {
    validate_key_code(
        &payload.code,
        &payload.description,
        payload.valid_from,
        payload.valid_to,
    )
    .map_err(ApiError::BadRequest)?;
    require_apartment(&state, payload.apartment_id).await?;

    let key_code = state
        .store
        .create_key_code(&payload)
        .await
        .map_err(|e| ApiError::from_database(e, "Key code"))?;
    info!(
        "Created key code {} for apartment {}",
        key_code.id, key_code.apartment_id
    );

    Ok((StatusCode::CREATED, Json(json!({ "keyCode": key_code }))))
}

/// Update a key code; the result must still be a valid key code
pub async fn update_key_code<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateKeyCodeRequest>,
) -> ApiResult<impl IntoResponse> {
    let changes = UpdateKeyCode {
        apartment_id: payload.apartment_id,
        code: payload.code,
        description: payload.description,
        valid_from: payload.valid_from,
        valid_to: payload.valid_to,
    };

    let mut preview = state
        .store
        .find_key_code(id)
        .await?
        .ok_or(ApiError::NotFound("Key code"))?;
    changes.apply_to(&mut preview);
    validate_key_code(
        &preview.code,
        &preview.description,
        preview.valid_from,
        preview.valid_to,
    )
    .map_err(ApiError::BadRequest)?;
    if let Some(apartment_id) = changes.apartment_id {
        require_apartment(&state, apartment_id).await?;
    }

    let key_code = state
        .store
        .update_key_code(id, &changes)
        .await
        .map_err(|e| ApiError::from_database(e, "Key code"))?;

    Ok(Json(json!({ "keyCode": key_code })))
}

/// Delete a key code
pub async fn delete_key_code<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .delete_key_code(id)
        .await
        .map_err(|e| ApiError::from_database(e, "Key code"))?;

    Ok(Json(json!({ "success": true })))
}

/// List apartments by name
pub async fn list_apartments<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<impl IntoResponse> {
    let apartments = state.store.list_apartments().await?;
    Ok(Json(json!({ "apartments": apartments })))
}

/// One apartment with its stays and key codes
pub async fn get_apartment<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let (apartment, visits, key_codes) = tokio::try_join!(
        state.store.find_apartment(id),
        state.store.stays_for_apartment(id),
        state.store.key_codes_for_apartment(id)
    )?;
    let apartment = apartment.ok_or(ApiError::NotFound("Apartment"))?;

    let apartment = ApartmentDetail {
        apartment,
        visits,
        key_codes,
    };

    Ok(Json(json!({ "apartment": apartment })))
}

/// Create an apartment
pub async fn create_apartment<S: Store>(
    State(state): State<AppState<S>>,
    Json(payload): Json<NewApartment>,
) -> ApiResult<impl IntoResponse> {
    validate_apartment(
        &payload.name,
        &payload.address,
        payload.latitude,
        payload.longitude,
    )
    .map_err(ApiError::BadRequest)?;

    let apartment = state
        .store
        .create_apartment(&NewApartment {
            name: payload.name.trim().to_string(),
            address: payload.address.trim().to_string(),
            ..payload
        })
        .await?;
    info!("Created apartment {}", apartment.id);

    Ok((StatusCode::CREATED, Json(json!({ "apartment": apartment }))))
}

/// Edit an apartment; the result must still be a valid apartment
pub async fn update_apartment<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApartmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let changes = UpdateApartment {
        name: payload.name.map(|name| name.trim().to_string()),
        address: payload.address.map(|address| address.trim().to_string()),
        description: payload.description,
        latitude: payload.latitude,
        longitude: payload.longitude,
    };

    let mut preview = state
        .store
        .find_apartment(id)
        .await?
        .ok_or(ApiError::NotFound("Apartment"))?;
    changes.apply_to(&mut preview);
    validate_apartment(
        &preview.name,
        &preview.address,
        preview.latitude,
        preview.longitude,
    )
    .map_err(ApiError::BadRequest)?;

    let apartment = state
        .store
        .update_apartment(id, &changes)
        .await
        .map_err(|e| ApiError::from_database(e, "Apartment"))?;

    Ok(Json(json!({ "apartment": apartment })))
}

/// Delete an apartment with its stays and key codes
pub async fn delete_apartment<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .delete_apartment(id)
        .await
        .map_err(|e| ApiError::from_database(e, "Apartment"))?;
    info!("Deleted apartment {}", id);

    Ok(Json(json!({ "success": true })))
}

async fn require_apartment<S: Store>(state: &AppState<S>, id: Uuid) -> ApiResult<()> {
    state
        .store
        .find_apartment(id)
        .await?
        .ok_or(ApiError::NotFound("Apartment"))?;
    Ok(())
}

/// List accounts with their stay statistics
pub async fn list_users<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<impl IntoResponse> {
    let (accounts, stays) =
        tokio::try_join!(state.store.list_accounts(), state.store.list_stays())?;

    let users: Vec<UserSummary> = accounts
        .into_iter()
        .map(|account| {
            let own: Vec<_> = stays
                .iter()
                .filter(|stay| stay.account_id == account.id)
                .cloned()
                .collect();
            UserSummary::new(account, &own)
        })
        .collect();

    Ok(Json(json!({ "users": users })))
}

/// Create an account; the role defaults to `CLIENT`
pub async fn create_user<S: Store>(
    State(state): State<AppState<S>>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);
    validate_email(&email).map_err(ApiError::BadRequest)?;
    validate_password(&payload.password).map_err(ApiError::BadRequest)?;
    validate_name(&payload.name).map_err(ApiError::BadRequest)?;

    let password_hash = state
        .credentials
        .hash_blocking(payload.password)
        .await
        .map_err(AuthError::from)?;

    let account = state
        .store
        .create_account(&NewAccount {
            email,
            name: payload.name.trim().to_string(),
            phone: payload.phone.filter(|phone| !phone.trim().is_empty()),
            password_hash,
            role: payload.role.unwrap_or_default(),
        })
        .await?;

    info!("Created account {} with role {}", account.id, account.role);

    Ok((StatusCode::CREATED, Json(json!({ "user": account }))))
}

/// One account with its stays
pub async fn get_user<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let (account, visits) = tokio::try_join!(
        state.store.find_account(id),
        state.store.stays_for_account(id)
    )?;
    let account = account.ok_or(ApiError::NotFound("User"))?;

    let user = UserDetail {
        summary: UserSummary::new(account, &visits),
        visits,
    };

    Ok(Json(json!({ "user": user })))
}

/// Edit an account; a supplied password is re-hashed
pub async fn update_user<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = payload.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        validate_email(email).map_err(ApiError::BadRequest)?;
    }
    if let Some(name) = &payload.name {
        validate_name(name).map_err(ApiError::BadRequest)?;
    }

    let password_hash = match payload.password {
        Some(password) => {
            validate_password(&password).map_err(ApiError::BadRequest)?;
            let hash = state
                .credentials
                .hash_blocking(password)
                .await
                .map_err(AuthError::from)?;
            Some(hash)
        }
        None => None,
    };

    let changes = UpdateAccount {
        email,
        name: payload.name.map(|name| name.trim().to_string()),
        phone: payload
            .phone
            .map(|phone| phone.filter(|phone| !phone.trim().is_empty())),
        password_hash,
        role: payload.role,
    };

    let account = state
        .store
        .update_account(id, &changes)
        .await
        .map_err(|e| ApiError::from_database(e, "User"))?;

    Ok(Json(json!({ "user": account })))
}

/// Delete an account and its stays
pub async fn delete_user<S: Store>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<Account>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if caller.id == id {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    state
        .store
        .delete_account(id)
        .await
        .map_err(|e| ApiError::from_database(e, "User"))?;
    info!("Deleted account {}", id);

    Ok(Json(json!({ "success": true })))
}

/// List every stay, latest check-in first
pub async fn list_visits<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<impl IntoResponse> {
    let visits = state.store.list_stays().await?;
    Ok(Json(json!({ "visits": visits })))
}

/// Book a stay for an existing account in an existing apartment
pub async fn create_visit<S: Store>(
    State(state): State<AppState<S>>,
    Json(payload): Json<NewStay>,
) -> ApiResult<impl IntoResponse> {
    validate_stay_window(payload.check_in, payload.check_out).map_err(ApiError::BadRequest)?;

    let (account, apartment) = tokio::try_join!(
        state.store.find_account(payload.account_id),
        state.store.find_apartment(payload.apartment_id)
    )?;
    account.ok_or(ApiError::NotFound("User"))?;
    apartment.ok_or(ApiError::NotFound("Apartment"))?;

    let visit = state
        .store
        .create_stay(&payload)
        .await
        .map_err(|e| ApiError::from_database(e, "Visit"))?;

    Ok((StatusCode::CREATED, Json(json!({ "visit": visit }))))
}

/// Delete a stay
pub async fn delete_visit<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .delete_stay(id)
        .await
        .map_err(|e| ApiError::from_database(e, "Visit"))?;

    Ok(Json(json!({ "success": true })))
}

/// The caller's active stay and how many key codes they can see
pub async fn dashboard<S: Store>(
    State(state): State<AppState<S>>,
    Extension(account): Extension<Account>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let (active_visit, key_codes) = tokio::try_join!(
        visibility::active_stay(&state.store, &account, now),
        visibility::visible_key_codes(&state.store, &state.store, &account, now)
    )?;

    Ok(Json(DashboardResponse {
        user: account,
        active_visit,
        key_code_count: key_codes.len(),
    }))
}
